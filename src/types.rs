//! Enumerations exchanged with the bare-metal API.
//!
//! Every enumeration emits only its recognised wire values but accepts any
//! string on ingestion: empty, missing, `null` and unrecognised values all
//! decode to the enumeration's default instead of failing.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident (default $default:ident) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal $(| $alias:literal)*,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every recognised value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation of the value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Parses a wire value, mapping anything unrecognised to the default.
            #[must_use]
            pub fn from_wire(value: &str) -> Self {
                match value {
                    $($wire $(| $alias)* => Self::$variant,)+
                    _ => Self::$default,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from_wire(value)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = Option::<String>::deserialize(deserializer)?;
                Ok(raw.as_deref().map_or_else(Self::default, Self::from_wire))
            }
        }
    };
}

wire_enum! {
    /// Operational status of a server.
    ServerStatus (default Unknown) {
        /// Status not reported or not recognised.
        Unknown => "unknown",
        /// Ordered but not yet delivered.
        Undelivered => "undelivered",
        /// Powered on and available.
        Ready => "ready",
        /// Shutting down.
        Stopping => "stopping",
        /// Powered off.
        Stopped => "stopped",
        /// Booting.
        Starting => "starting",
        /// Failed; needs operator attention.
        Error => "error",
        /// Being removed.
        Deleting => "deleting",
        /// Locked by the provider.
        Locked => "locked",
    }
}

wire_enum! {
    /// Status of an operating system installation.
    ServerInstallStatus (default Unknown) {
        /// Status not reported or not recognised.
        Unknown => "unknown",
        /// Installation finished.
        Completed => "completed",
        /// Installation in progress.
        Installing => "installing",
        /// Installation queued.
        ToInstall => "to_install",
        /// Installation failed.
        Error => "error",
    }
}

wire_enum! {
    /// Boot mode of a server.
    ServerBootType (default Normal) {
        /// Boots the installed operating system.
        Normal => "normal",
        /// Boots the rescue image.
        Rescue => "rescue",
    }
}

/// Boot mode requested by a reboot; shares the server boot modes.
pub type RebootBootType = ServerBootType;

wire_enum! {
    /// Address family of a server IP.
    IpVersion (default Ipv4) {
        /// IPv4 address.
        Ipv4 => "Ipv4" | "IPv4",
        /// IPv6 address.
        Ipv6 => "Ipv6" | "IPv6",
    }
}

wire_enum! {
    /// Validation status of a reverse DNS record.
    IpReverseStatus (default Unknown) {
        /// Status not reported or not recognised.
        Unknown => "unknown",
        /// Record awaiting validation.
        Pending => "pending",
        /// Record validated and served.
        Active => "active",
        /// Validation failed; see the status message.
        Error => "error",
    }
}

wire_enum! {
    /// Sort order accepted by list operations.
    ListOrderBy (default CreatedAtAsc) {
        /// Oldest first.
        CreatedAtAsc => "created_at_asc",
        /// Newest first.
        CreatedAtDesc => "created_at_desc",
    }
}

wire_enum! {
    /// Availability of an offer.
    OfferStock (default Empty) {
        /// Out of stock.
        Empty => "empty",
        /// Few machines left.
        Low => "low",
        /// In stock.
        Available => "available",
    }
}

impl ServerStatus {
    /// Statuses after which no automatic transition is expected soon.
    ///
    /// `Unknown` is included so an unrecognised status unblocks waiters.
    pub const TERMINAL: &'static [Self] = &[
        Self::Ready,
        Self::Stopped,
        Self::Error,
        Self::Locked,
        Self::Unknown,
    ];

    /// Whether a server wait should stop on this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }
}

impl ServerInstallStatus {
    /// Install statuses after which a wait stops.
    pub const TERMINAL: &'static [Self] = &[Self::Completed, Self::Error, Self::Unknown];

    /// Whether an install wait should stop on this status.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn decode<T: for<'de> Deserialize<'de>>(json: &str) -> T {
        serde_json::from_str(json).unwrap_or_else(|err| panic!("decode {json}: {err}"))
    }

    #[test]
    fn every_value_survives_the_wire() {
        for status in ServerStatus::ALL {
            let json = serde_json::to_string(status).unwrap_or_else(|err| panic!("{err}"));
            assert_eq!(decode::<ServerStatus>(&json), *status);
        }
        for status in ServerInstallStatus::ALL {
            assert_eq!(ServerInstallStatus::from_wire(status.as_str()), *status);
        }
        for status in IpReverseStatus::ALL {
            assert_eq!(IpReverseStatus::from_wire(status.as_str()), *status);
        }
    }

    #[rstest]
    #[case::empty(r#""""#)]
    #[case::null("null")]
    #[case::unrecognised(r#""quarantined""#)]
    fn server_status_falls_back_to_unknown(#[case] json: &str) {
        assert_eq!(decode::<ServerStatus>(json), ServerStatus::Unknown);
    }

    #[rstest]
    #[case::empty(r#""""#, IpVersion::Ipv4)]
    #[case::lowercase(r#""ipv6""#, IpVersion::Ipv4)]
    #[case::canonical(r#""Ipv6""#, IpVersion::Ipv6)]
    #[case::alias(r#""IPv6""#, IpVersion::Ipv6)]
    fn ip_version_is_case_sensitive(#[case] json: &str, #[case] expected: IpVersion) {
        assert_eq!(decode::<IpVersion>(json), expected);
    }

    #[test]
    fn defaults_match_documented_values() {
        assert_eq!(ServerBootType::default(), ServerBootType::Normal);
        assert_eq!(ListOrderBy::default(), ListOrderBy::CreatedAtAsc);
        assert_eq!(decode::<ListOrderBy>(r#""sideways""#), ListOrderBy::CreatedAtAsc);
        assert_eq!(decode::<IpReverseStatus>(r#""""#), IpReverseStatus::Unknown);
        assert_eq!(decode::<ServerInstallStatus>(r#""bogus""#), ServerInstallStatus::Unknown);
    }

    #[test]
    fn serialises_as_wire_string() {
        let json = serde_json::to_string(&ServerInstallStatus::ToInstall)
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(json, r#""to_install""#);
        assert_eq!(IpVersion::Ipv6.to_string(), "Ipv6");
    }

    #[test]
    fn terminal_sets_include_unknown() {
        assert!(ServerStatus::Unknown.is_terminal());
        assert!(!ServerStatus::Starting.is_terminal());
        assert!(ServerInstallStatus::Unknown.is_terminal());
        assert!(!ServerInstallStatus::Installing.is_terminal());
    }
}
