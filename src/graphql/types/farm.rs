use super::to_id;
use crate::domain;
use async_graphql::{Object, ID};

/// GraphQL representation of a Farm
#[derive(Clone)]
pub struct Farm {
    pub inner: domain::Farm,
}

impl From<domain::Farm> for Farm {
    fn from(farm: domain::Farm) -> Self {
        Self { inner: farm }
    }
}

#[Object]
impl Farm {
    async fn id(&self) -> ID {
        to_id(self.inner.id)
    }

    async fn title(&self) -> &str {
        &self.inner.info.title
    }

    async fn slug(&self) -> &str {
        &self.inner.info.slug
    }

    /// Whether the farm is currently operated
    async fn current(&self) -> bool {
        self.inner.current
    }

    async fn street(&self) -> Option<&str> {
        self.inner.address.street.as_deref()
    }

    async fn city(&self) -> Option<&str> {
        self.inner.address.city.as_deref()
    }

    async fn state(&self) -> Option<&str> {
        self.inner.address.state.as_deref()
    }

    async fn zipcode(&self) -> Option<&str> {
        self.inner.address.zipcode.as_deref()
    }

    async fn phone(&self) -> Option<&str> {
        self.inner.address.phone.as_deref()
    }
}
