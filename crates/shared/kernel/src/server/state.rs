//! Shared application state: configuration, the database session, and the
//! registry of type-erased feature slices.

use axum::extract::FromRef;
use fxhash::FxHashMap;
use shub_database::Database;
use shub_domain::config::ApiConfig;
use shub_domain::registry::{FeatureSlice, InitializedSlice};
use std::any::TypeId;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[shub_derive::shub_error]
pub enum ApiStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("State missing feature slice{}: {message}", format_context(.context))]
    MissingSlice { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub database: Database,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Arc-wrapped state handed to every request handler.
#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }

    /// Looks up a registered slice by its concrete type.
    #[must_use]
    pub fn get_slice<T: FeatureSlice>(&self) -> Option<&T> {
        let initialized = self.inner.slices.get(&TypeId::of::<T>())?;
        initialized.state.as_any().downcast_ref::<T>()
    }

    /// Like [`Self::get_slice`], but a missing slice is an error naming the
    /// absent type.
    ///
    /// # Errors
    /// Returns [`ApiStateError::MissingSlice`] if the slice was never
    /// registered.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, ApiStateError> {
        self.get_slice::<T>().ok_or_else(|| ApiStateError::MissingSlice {
            message: std::any::type_name::<T>().into(),
            context: None,
        })
    }

    /// Type IDs of every registered slice, for diagnostics.
    pub fn slice_ids(&self) -> impl Iterator<Item = &TypeId> {
        self.inner.slices.keys()
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<ApiState> for Database {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.database.clone()
    }
}

/// Collects the state's parts; [`ApiStateBuilder::build`] checks the two
/// mandatory ones.
#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    database: Option<Database>,
    registered: Vec<InitializedSlice>,
}

impl ApiStateBuilder {
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn db(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.registered.push(slice);
        self
    }

    pub fn register_slices<I>(mut self, slices: I) -> Self
    where
        I: IntoIterator<Item = InitializedSlice>,
    {
        self.registered.extend(slices);
        self
    }

    /// # Errors
    /// Returns [`ApiStateError::Validation`] when the configuration or the
    /// database session is missing.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let config = self.config.ok_or_else(|| missing("ApiConfig not provided"))?;
        let database = self.database.ok_or_else(|| missing("Database not provided"))?;

        let slices: FxHashMap<TypeId, InitializedSlice> =
            self.registered.into_iter().map(|slice| (slice.id, slice)).collect();

        Ok(ApiState { inner: Arc::new(ApiStateInner { config, database, slices }) })
    }
}

fn missing(what: &'static str) -> ApiStateError {
    ApiStateError::Validation { message: what.into(), context: None }
}
