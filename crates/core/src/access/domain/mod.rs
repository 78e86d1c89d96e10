pub mod enrolled_identity;
pub mod identity_matcher;
pub mod verdict;
