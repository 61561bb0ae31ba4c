// src/models/status.rs
//! Record statuses, all generated through define_status_enum!

use serde::{Serialize, Deserialize};

/// Generates a status enum with as_str, from_str, is_valid, Display and FromStr.
/// Parsing ignores ASCII case; storage and JSON use the canonical spelling.
macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident => $str_val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        $vis enum $name {
            $( #[serde(rename = $str_val)] $variant ),+
        }

        impl $name {
            #[inline]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $str_val ),+
                }
            }

            pub fn from_str(s: &str) -> Option<Self> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($str_val) {
                        return Some($name::$variant);
                    }
                )+
                None
            }

            #[inline]
            pub fn is_valid(s: &str) -> bool {
                Self::from_str(s).is_some()
            }

            pub const fn all_values() -> &'static [&'static str] {
                &[ $( $str_val ),+ ]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_str(s).ok_or_else(|| format!(
                    "Invalid status '{}'. Must be one of: {}",
                    s,
                    Self::all_values().join(", ")
                ))
            }
        }
    };
}

// ==================== CHUIRA BATCH ====================

define_status_enum! {
    /// Production batch state
    pub enum ChuiraStatus {
        InProgress => "In Progress",
        Completed => "Completed",
        Failed => "Failed",
    }
}

impl Default for ChuiraStatus {
    fn default() -> Self {
        ChuiraStatus::InProgress
    }
}

// ==================== EXPENSE ====================

define_status_enum! {
    /// Approval state of an extra expense
    pub enum ExpenseStatus {
        Pending => "Pending",
        Approved => "Approved",
        Rejected => "Rejected",
    }
}

impl Default for ExpenseStatus {
    fn default() -> Self {
        ExpenseStatus::Pending
    }
}

// ==================== SALES ====================

define_status_enum! {
    pub enum SalesStatus {
        Pending => "Pending",
        Completed => "Completed",
        Canceled => "Canceled",
    }
}

impl Default for SalesStatus {
    fn default() -> Self {
        SalesStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chuira_status() {
        assert_eq!(ChuiraStatus::InProgress.as_str(), "In Progress");
        assert_eq!(ChuiraStatus::from_str("in progress"), Some(ChuiraStatus::InProgress));
        assert_eq!(ChuiraStatus::from_str("COMPLETED"), Some(ChuiraStatus::Completed));
        assert!(ChuiraStatus::is_valid("Failed"));
        assert!(!ChuiraStatus::is_valid("in_progress"));
        assert_eq!(ChuiraStatus::default(), ChuiraStatus::InProgress);
    }

    #[test]
    fn test_expense_status_parse_error_lists_values() {
        let err = "Paid".parse::<ExpenseStatus>().unwrap_err();
        assert!(err.contains("Pending, Approved, Rejected"));
        assert_eq!("approved".parse::<ExpenseStatus>(), Ok(ExpenseStatus::Approved));
    }

    #[test]
    fn test_sales_status_serde() {
        let json = serde_json::to_string(&SalesStatus::Canceled).unwrap();
        assert_eq!(json, "\"Canceled\"");
        let parsed: ChuiraStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, ChuiraStatus::InProgress);
    }
}
