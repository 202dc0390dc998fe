//! Data model: endpoint payloads in, output records out

mod listing;
mod records;

pub use listing::{About, Listing, ListingData, Submission, SubredditPost, Thing, UserProfile};
pub use records::{CandidateUser, PostRecord};
