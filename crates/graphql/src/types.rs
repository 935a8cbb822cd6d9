//! GraphQL type definitions.

use async_graphql::{EmptyMutation, EmptySubscription, Schema};

use crate::schema::MovieQuery;

/// The gateway's GraphQL schema type.
pub type CinegraphSchema = Schema<MovieQuery, EmptyMutation, EmptySubscription>;
