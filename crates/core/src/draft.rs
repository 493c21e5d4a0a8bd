//! Draft meal status values.
//!
//! Drafts are meal ideas submitted from the "what's in my fridge" flow that
//! wait for an admin to approve or reject them.

pub const DRAFT_STATUS_PENDING: &str = "pending";
pub const DRAFT_STATUS_APPROVED: &str = "approved";
pub const DRAFT_STATUS_REJECTED: &str = "rejected";
