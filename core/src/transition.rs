use crate::bus::Bus;
use crate::outcome::Outcome;
use async_trait::async_trait;

/// Marker for the shared resources a transition needs (content client,
/// configuration, ...). Resources are owned by the server and lent to every
/// request.
pub trait ResourceRequirement: Send + Sync + 'static {}

impl ResourceRequirement for () {}

/// The contract for a Typed State Transition.
///
/// `Transition` converts state `From` into `Outcome<To, Error>`, with
/// read-only access to the shared resources and mutable access to the
/// request's [`Bus`].
#[async_trait]
pub trait Transition<From, To>: Send + Sync + 'static
where
    From: Send + 'static,
    To: Send + 'static,
{
    /// Domain-specific error type (e.g., CmsError, SiteError)
    type Error: Send + Sync + 'static;

    /// Shared resources handed to every run
    type Resources: ResourceRequirement;

    /// Label used in pipeline spans. Defaults to the type's short name.
    fn label(&self) -> String {
        short_type_name::<Self>()
    }

    async fn run(
        &self,
        state: From,
        resources: &Self::Resources,
        bus: &mut Bus,
    ) -> Outcome<To, Self::Error>;
}

/// "module::LoadArticle" -> "LoadArticle"
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
