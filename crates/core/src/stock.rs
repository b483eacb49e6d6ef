//! Stock row status and management category, plus the derived status rules.
//!
//! Status is never set directly by callers of the lend/return/disposal paths;
//! it follows from the movement applied and the quantity left afterwards
//! (see [`status_after`]).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Quantity;

/// Lookup id type matching SMALLINT in the database.
pub type LookupId = i16;

macro_rules! define_lookup_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database lookup id.
            pub fn id(self) -> LookupId {
                self as LookupId
            }

            /// Seed-data name of this value.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            pub fn from_id(id: LookupId) -> Result<Self, CoreError> {
                match id {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        concat!("Unknown ", stringify!($name), " id {}"),
                        other
                    ))),
                }
            }
        }

        impl From<$name> for LookupId {
            fn from(value: $name) -> Self {
                value as LookupId
            }
        }
    };
}

define_lookup_enum! {
    /// Derived condition of a stock row.
    StockStatus {
        Normal = 1 => "normal",
        Broken = 2 => "broken",
        Lent = 3 => "lent",
        Disposed = 4 => "disposed",
    }
}

define_lookup_enum! {
    /// How a master's stock is tracked.
    ManagementCategory {
        /// One physical unit per master; quantity is 0 or 1.
        Individual = 1 => "individual",
        /// A pooled count of interchangeable units.
        Collective = 2 => "collective",
    }
}

impl ManagementCategory {
    /// Largest quantity a single stock row may hold.
    pub fn max_quantity(self) -> Option<Quantity> {
        match self {
            ManagementCategory::Individual => Some(1),
            ManagementCategory::Collective => None,
        }
    }
}

/// A quantity-changing operation applied to a locked stock row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Lend,
    Return,
    Dispose,
    UndoDispose,
    /// Absolute quantity edit through the stock editor.
    Edit,
}

/// Status the row should move to after `movement` left `new_quantity` units
/// in stock. `None` means the status stays as it is.
pub fn status_after(
    current: StockStatus,
    movement: Movement,
    new_quantity: Quantity,
    category: ManagementCategory,
) -> Option<StockStatus> {
    let next = match movement {
        Movement::Dispose if new_quantity == 0 => StockStatus::Disposed,
        Movement::Dispose => return None,
        Movement::UndoDispose if new_quantity > 0 => StockStatus::Normal,
        Movement::UndoDispose => return None,
        Movement::Lend
            if category == ManagementCategory::Individual
                && new_quantity == 0
                && current == StockStatus::Normal =>
        {
            StockStatus::Lent
        }
        Movement::Lend => return None,
        Movement::Return | Movement::Edit
            if new_quantity > 0
                && matches!(current, StockStatus::Lent | StockStatus::Disposed) =>
        {
            StockStatus::Normal
        }
        Movement::Return | Movement::Edit => return None,
    };
    (next != current).then_some(next)
}

/// Check that applying `delta` to `current` keeps the row non-negative and
/// within the category's capacity. Returns the resulting quantity.
pub fn checked_apply(
    current: Quantity,
    delta: Quantity,
    category: ManagementCategory,
) -> Option<Quantity> {
    let next = current.checked_add(delta)?;
    if next < 0 {
        return None;
    }
    match category.max_quantity() {
        Some(max) if next > max => None,
        _ => Some(next),
    }
}

/// Manual condition flag accepted by the stock editor.
pub fn toggle_broken(current: StockStatus, broken: bool) -> Result<Option<StockStatus>, CoreError> {
    match (current, broken) {
        (StockStatus::Disposed, _) => Err(CoreError::Conflict(
            "cannot change the condition of a disposed item".to_string(),
        )),
        (StockStatus::Broken, true) | (StockStatus::Normal, false) | (StockStatus::Lent, false) => {
            Ok(None)
        }
        (_, true) => Ok(Some(StockStatus::Broken)),
        (StockStatus::Broken, false) => Ok(Some(StockStatus::Normal)),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use ManagementCategory::{Collective, Individual};
    use StockStatus::{Broken, Disposed, Lent, Normal};

    #[test]
    fn lookup_ids_match_seed_data() {
        assert_eq!(Normal.id(), 1);
        assert_eq!(Broken.id(), 2);
        assert_eq!(Lent.id(), 3);
        assert_eq!(Disposed.id(), 4);
        assert_eq!(Individual.id(), 1);
        assert_eq!(Collective.id(), 2);
        assert_eq!(StockStatus::from_id(4).unwrap(), Disposed);
        assert_matches!(StockStatus::from_id(9), Err(CoreError::Validation(_)));
        assert_eq!(Disposed.name(), "disposed");
    }

    #[test]
    fn disposal_to_zero_marks_disposed() {
        assert_eq!(status_after(Normal, Movement::Dispose, 0, Collective), Some(Disposed));
        assert_eq!(status_after(Normal, Movement::Dispose, 3, Collective), None);
    }

    #[test]
    fn undo_restores_normal_when_positive() {
        assert_eq!(status_after(Disposed, Movement::UndoDispose, 5, Collective), Some(Normal));
        assert_eq!(status_after(Normal, Movement::UndoDispose, 5, Collective), None);
    }

    #[test]
    fn collective_lend_leaves_status_alone() {
        assert_eq!(status_after(Normal, Movement::Lend, 0, Collective), None);
    }

    #[test]
    fn individual_lend_marks_lent() {
        assert_eq!(status_after(Normal, Movement::Lend, 0, Individual), Some(Lent));
        assert_eq!(status_after(Broken, Movement::Lend, 0, Individual), None);
    }

    #[test]
    fn return_from_empty_states_restores_normal() {
        assert_eq!(status_after(Lent, Movement::Return, 1, Individual), Some(Normal));
        assert_eq!(status_after(Disposed, Movement::Return, 2, Collective), Some(Normal));
        assert_eq!(status_after(Broken, Movement::Return, 2, Collective), None);
        assert_eq!(status_after(Normal, Movement::Return, 2, Collective), None);
    }

    #[test]
    fn checked_apply_rejects_negative_and_over_capacity() {
        assert_eq!(checked_apply(5, -5, Collective), Some(0));
        assert_eq!(checked_apply(5, -6, Collective), None);
        assert_eq!(checked_apply(1, 1, Individual), None);
        assert_eq!(checked_apply(0, 1, Individual), Some(1));
        assert_eq!(checked_apply(i32::MAX, 1, Collective), None);
    }

    #[test]
    fn broken_flag_transitions() {
        assert_eq!(toggle_broken(Normal, true).unwrap(), Some(Broken));
        assert_eq!(toggle_broken(Broken, false).unwrap(), Some(Normal));
        assert_eq!(toggle_broken(Broken, true).unwrap(), None);
        assert_eq!(toggle_broken(Lent, true).unwrap(), Some(Broken));
        assert_matches!(toggle_broken(Disposed, true), Err(CoreError::Conflict(_)));
    }
}
