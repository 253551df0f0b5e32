use crate::core::models::{code::VotingCode, tally::Tally};
use crate::error::Error;

/// Renders results and code listings into a downloadable document.
pub trait Exporter {
    const CONTENT_TYPE: &'static str;
    const EXTENSION: &'static str;

    fn results(&self, tally: &Tally) -> Result<Vec<u8>, Error>;
    fn codes(&self, codes: &[VotingCode]) -> Result<Vec<u8>, Error>;
}
