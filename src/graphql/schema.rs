use crate::app::FarmServices;
use crate::graphql::resolvers::{Mutation, Query};
use async_graphql::{EmptySubscription, Schema};

/// GraphQL context containing shared application state
pub struct GraphQLContext {
    pub services: FarmServices,
}

/// The complete GraphQL schema
pub type GraphQLSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create a new GraphQL schema over the given services
pub fn create_schema(services: FarmServices) -> GraphQLSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(GraphQLContext { services })
        .finish()
}
