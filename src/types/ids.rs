//! Opaque string identifiers, newtype-wrapped so call sites can't
//! transpose an `OrderId` and a `WaveId` by accident.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

opaque_id!(OrderId);
opaque_id!(CustomerId);
opaque_id!(WaveId);
opaque_id!(PathId);
opaque_id!(StationId);
opaque_id!(ReservationId);
opaque_id!(AllocationId);
opaque_id!(Sku);
opaque_id!(ToteId);
opaque_id!(WorkflowId);
opaque_id!(RunId);
opaque_id!(RouteId);
opaque_id!(TaskId);
opaque_id!(PackageId);
opaque_id!(TrackingNumber);
opaque_id!(ManifestId);
opaque_id!(CarrierId);
opaque_id!(BatchId);
opaque_id!(ChuteId);
opaque_id!(UnitId);
