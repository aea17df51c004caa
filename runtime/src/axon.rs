//! # Axon: Executable Page Pipeline
//!
//! An `Axon` chains [`Transition`]s into one reusable pipeline
//! `In -> Out`. Each step sees the shared resources and the request
//! [`Bus`]. The first `Branch` or `Fault` short-circuits the rest.
//!
//! ```rust,ignore
//! let article = Axon::<PageRequest, PageRequest, SiteError, SiteResources>::new("ArticlePage")
//!     .then(HandleFormPost)
//!     .then(LoadGlobal)
//!     .then(LoadArticle)
//!     .then(RenderArticle);
//!
//! let html = article.execute(req, &resources, &mut Bus::new()).await;
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tideline_core::bus::Bus;
use tideline_core::outcome::Outcome;
use tideline_core::transition::{ResourceRequirement, Transition};
use tracing::Instrument;

/// Type alias for async boxed futures used in Axon execution.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Executor for a composed chain of steps.
pub type Executor<In, Out, E, Res> = Arc<
    dyn for<'a> Fn(In, &'a Res, &'a mut Bus) -> BoxFuture<'a, Outcome<Out, E>> + Send + Sync,
>;

/// Reusable, thread-safe pipeline of transitions.
pub struct Axon<In, Out, E, Res = ()> {
    label: String,
    steps: Vec<String>,
    executor: Executor<In, Out, E, Res>,
}

impl<In, Out, E, Res> Clone for Axon<In, Out, E, Res> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            steps: self.steps.clone(),
            executor: self.executor.clone(),
        }
    }
}

impl<In, E, Res> Axon<In, In, E, Res>
where
    In: Send + 'static,
    E: Send + 'static,
    Res: ResourceRequirement,
{
    /// Start an identity pipeline (`In -> In`).
    pub fn new(label: &str) -> Self {
        let executor: Executor<In, In, E, Res> = Arc::new(
            move |input: In, _res: &Res, _bus: &mut Bus| -> BoxFuture<'_, Outcome<In, E>> {
                Box::pin(std::future::ready(Outcome::Next(input)))
            },
        );

        Self {
            label: label.to_string(),
            steps: Vec::new(),
            executor,
        }
    }
}

impl<In, Out, E, Res> Axon<In, Out, E, Res>
where
    In: Send + 'static,
    Out: Send + 'static,
    E: Send + 'static,
    Res: ResourceRequirement,
{
    /// Chain a transition to this Axon.
    pub fn then<Next, Trans>(self, transition: Trans) -> Axon<In, Next, E, Res>
    where
        Next: Send + 'static,
        Trans: Transition<Out, Next, Error = E, Resources = Res>,
    {
        let Axon {
            label,
            mut steps,
            executor: prev_executor,
        } = self;

        let step_label = transition.label();
        steps.push(step_label.clone());
        let transition = Arc::new(transition);

        let next_executor: Executor<In, Next, E, Res> = Arc::new(
            move |input: In, res: &Res, bus: &mut Bus| -> BoxFuture<'_, Outcome<Next, E>> {
                let prev = prev_executor.clone();
                let trans = transition.clone();
                let step_label = step_label.clone();

                Box::pin(async move {
                    let state = match prev(input, res, bus).await {
                        Outcome::Next(state) => state,
                        Outcome::Branch(id, payload) => return Outcome::Branch(id, payload),
                        Outcome::Fault(e) => return Outcome::Fault(e),
                    };

                    trans
                        .run(state, res, bus)
                        .instrument(tracing::debug_span!("Step", tideline.step = %step_label))
                        .await
                })
            },
        );

        Axon {
            label,
            steps,
            executor: next_executor,
        }
    }

    /// Execute the Axon with the given input.
    pub async fn execute(&self, input: In, resources: &Res, bus: &mut Bus) -> Outcome<Out, E> {
        let outcome = (self.executor)(input, resources, bus)
            .instrument(tracing::info_span!("Circuit", tideline.circuit = %self.label))
            .await;

        match &outcome {
            Outcome::Next(_) => {}
            Outcome::Branch(id, _) => {
                tracing::debug!(circuit = %self.label, branch = %id, "pipeline branched")
            }
            Outcome::Fault(_) => tracing::debug!(circuit = %self.label, "pipeline faulted"),
        }
        outcome
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Step labels in execution order.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }
}
