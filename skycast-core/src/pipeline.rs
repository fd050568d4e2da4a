use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use crate::error::WeatherError;
use crate::model::{Location, Query, WeatherReport};
use crate::provider::WeatherProvider;

/// Sequential fetch pipeline: geocode, then current conditions, then the
/// noon-sampled forecast. Stateless; one instance serves any number of
/// queries.
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    provider: Arc<dyn WeatherProvider>,
}

impl ForecastPipeline {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Resolve a city name to coordinates.
    ///
    /// Blank input is rejected before any request is made.
    pub async fn resolve_city(&self, city: &str) -> Result<Location, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::Validation("city name required".to_string()));
        }

        match self.provider.geocode(city).await? {
            Some(location) => Ok(location),
            None => Err(WeatherError::NotFound(city.to_string())),
        }
    }

    /// Run one full lookup. The three provider calls happen strictly in
    /// order and the first failure aborts the rest; the report is
    /// all-or-nothing.
    pub async fn run_query(&self, query: &Query) -> Result<WeatherReport, WeatherError> {
        let location = self.resolve_city(&query.city).await?;
        debug!(
            "resolved {:?} to ({}, {})",
            query.city, location.latitude, location.longitude
        );

        let conditions = self.provider.current_conditions(location).await?;
        let forecast = self.provider.forecast(location).await?;

        Ok(WeatherReport {
            conditions,
            forecast,
        })
    }
}

/// Lookup lifecycle for one widget instance.
///
/// The whole value is replaced on every transition, so observers never see
/// a half-updated mix of old and new data. A failure keeps the last good
/// report next to the error.
#[derive(Debug, Clone, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Loading {
        last_good: Option<WeatherReport>,
    },
    Ready(WeatherReport),
    Failed {
        error: WeatherError,
        last_good: Option<WeatherReport>,
    },
}

impl QueryState {
    /// The most recent successful report surviving in this state, if any.
    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            QueryState::Idle => None,
            QueryState::Loading { last_good } | QueryState::Failed { last_good, .. } => {
                last_good.as_ref()
            }
            QueryState::Ready(report) => Some(report),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }

    pub fn error(&self) -> Option<&WeatherError> {
        match self {
            QueryState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: QueryState,
    generation: u64,
}

/// Owns the displayed result and the single in-flight query of one widget
/// instance.
///
/// Submitting supersedes any query still in flight: the old task is
/// aborted, and if it races to completion anyway its outcome is discarded
/// instead of overwriting the newer one.
#[derive(Debug)]
pub struct ForecastSession {
    pipeline: ForecastPipeline,
    inner: Arc<Mutex<Inner>>,
    inflight: Mutex<Option<AbortHandle>>,
}

impl ForecastSession {
    pub fn new(pipeline: ForecastPipeline) -> Self {
        Self {
            pipeline,
            inner: Arc::new(Mutex::new(Inner {
                state: QueryState::Idle,
                generation: 0,
            })),
            inflight: Mutex::new(None),
        }
    }

    /// Snapshot of the current lookup state.
    pub fn state(&self) -> QueryState {
        self.inner.lock().state.clone()
    }

    /// Start a lookup, superseding any prior one still in flight.
    ///
    /// The returned handle resolves once this query's outcome has been
    /// applied, or discarded if it was itself superseded. Must be called
    /// from within a Tokio runtime.
    pub fn submit(&self, query: Query) -> JoinHandle<()> {
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            let last_good = inner.state.report().cloned();
            inner.state = QueryState::Loading { last_good };
            inner.generation
        };

        if let Some(prior) = self.inflight.lock().take() {
            prior.abort();
        }

        let pipeline = self.pipeline.clone();
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let outcome = pipeline.run_query(&query).await;

            let mut inner = inner.lock();
            if inner.generation != generation {
                debug!("discarding superseded result for {:?}", query.city);
                return;
            }

            inner.state = match outcome {
                Ok(report) => QueryState::Ready(report),
                Err(error) => {
                    warn!("lookup for {:?} failed: {error}", query.city);
                    let last_good = inner.state.report().cloned();
                    QueryState::Failed { error, last_good }
                }
            };
        });

        *self.inflight.lock() = Some(handle.abort_handle());
        handle
    }
}
