//! Gateways
//!
//! Thin components that shape an inbound request into an upstream completion
//! and the completion into an outbound reply.

pub mod coach;
pub mod sentiment;

pub use coach::{CoachGateway, CoachReply, CoachRequest};
pub use sentiment::{SentimentGateway, SentimentLabel, SentimentRequest, SentimentResult};
