pub mod test_candidates;
pub mod test_negotiation_failure;
