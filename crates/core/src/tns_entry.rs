//! Transient notice records as stored in `tns_entries`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::GROUP_LIST_SEPARATOR;
use crate::error::{CoreError, Result};

/// Column widths of the VARCHAR columns, in characters.
pub mod widths {
    pub const NAME: usize = 64;
    pub const RA: usize = 16;
    pub const DEC: usize = 16;
    pub const OBJECT_TYPE: usize = 16;
    pub const HOST_NAME: usize = 64;
    pub const GROUP_LIST: usize = 256;
    pub const INTERNAL_NAMES: usize = 128;
    pub const PUBLIC: usize = 4;
    pub const SENDER: usize = 64;
}

/// Ordered list of group names packed into one text column.
///
/// Stored comma-separated. Parsing trims each part and drops empty ones,
/// so `"ZTF, ATLAS,,"` reads back as `["ZTF", "ATLAS"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupList(Vec<String>);

impl GroupList {
    #[must_use]
    pub fn new(groups: Vec<String>) -> Self {
        Self(groups)
    }

    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column representation.
    #[must_use]
    pub fn to_column(&self) -> String {
        self.0.join(&GROUP_LIST_SEPARATOR.to_string())
    }

    /// Check that every group survives the trip through one text column:
    /// no separator inside a name, no blank names, no padding.
    pub fn validate(&self, column: &str) -> Result<()> {
        for group in &self.0 {
            if group.contains(GROUP_LIST_SEPARATOR) {
                return Err(CoreError::InvalidInput(format!(
                    "{column} group `{group}` contains the separator `{GROUP_LIST_SEPARATOR}`"
                )));
            }
            if group.trim().is_empty() {
                return Err(CoreError::InvalidInput(format!("{column} contains a blank group")));
            }
            if group.trim() != group {
                return Err(CoreError::InvalidInput(format!(
                    "{column} group `{group}` has surrounding whitespace"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn from_column(column: &str) -> Self {
        let groups = column
            .split(GROUP_LIST_SEPARATOR)
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_owned)
            .collect();
        Self(groups)
    }
}

impl fmt::Display for GroupList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_column())
    }
}

impl FromStr for GroupList {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::from_column(s))
    }
}

impl<S: Into<String>> FromIterator<S> for GroupList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One TNS object, one row of `tns_entries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TnsEntry {
    pub objid: i32,
    pub name: Option<String>,
    pub ra: Option<String>,
    pub radeg: Option<f64>,
    pub dec: Option<String>,
    pub decdeg: Option<f64>,
    pub object_type: Option<String>,
    pub host_name: Option<String>,
    pub host_redshift: Option<f64>,
    pub reporting_groups: Option<GroupList>,
    pub discovery_data_sources: Option<GroupList>,
    pub classifying_groups: Option<GroupList>,
    pub internal_names: Option<String>,
    pub public: Option<String>,
    pub spectra_count: Option<i32>,
    pub discovery_mag: Option<f64>,
    pub discovery_filter: Option<f64>,
    pub discovery_date: Option<DateTime<Utc>>,
    pub sender: Option<String>,
}

impl TnsEntry {
    /// Entry with only the primary key set.
    #[must_use]
    pub fn new(objid: i32) -> Self {
        Self {
            objid,
            name: None,
            ra: None,
            radeg: None,
            dec: None,
            decdeg: None,
            object_type: None,
            host_name: None,
            host_redshift: None,
            reporting_groups: None,
            discovery_data_sources: None,
            classifying_groups: None,
            internal_names: None,
            public: None,
            spectra_count: None,
            discovery_mag: None,
            discovery_filter: None,
            discovery_date: None,
            sender: None,
        }
    }

    /// Check every text column against its declared width.
    ///
    /// MySQL in strict mode rejects overlong values and in non-strict mode
    /// silently truncates them; both are worse than a clear error here.
    pub fn validate(&self) -> Result<()> {
        check_width("name", self.name.as_deref(), widths::NAME)?;
        check_width("ra", self.ra.as_deref(), widths::RA)?;
        check_width("dec", self.dec.as_deref(), widths::DEC)?;
        check_width("object_type", self.object_type.as_deref(), widths::OBJECT_TYPE)?;
        check_width("host_name", self.host_name.as_deref(), widths::HOST_NAME)?;
        for (column, list) in [
            ("reporting_groups", &self.reporting_groups),
            ("discovery_data_sources", &self.discovery_data_sources),
            ("classifying_groups", &self.classifying_groups),
        ] {
            if let Some(list) = list {
                list.validate(column)?;
            }
            let packed = list.as_ref().map(GroupList::to_column);
            check_width(column, packed.as_deref(), widths::GROUP_LIST)?;
        }
        check_width("internal_names", self.internal_names.as_deref(), widths::INTERNAL_NAMES)?;
        check_width("public", self.public.as_deref(), widths::PUBLIC)?;
        check_width("sender", self.sender.as_deref(), widths::SENDER)?;
        Ok(())
    }
}

fn check_width(column: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(CoreError::InvalidInput(format!(
            "{column} is {} characters, column allows {max}",
            v.chars().count()
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "tns_entry_tests.rs"]
mod tests;
