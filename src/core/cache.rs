//! Model caching utilities for sharing weights across multiple pipelines.
//!
//! Pipelines built with the same model options on the same device share one
//! loaded model. The cache only holds weak references, so weights are freed
//! once the last pipeline using them is dropped.

use super::error::Result;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Trait implemented by model option types to generate a stable cache key.
pub trait ModelOptions {
    fn cache_key(&self) -> String;
}

type CacheStorage = HashMap<(TypeId, String), Box<dyn Any + Send + Sync>>;

/// A thread-safe cache for model instances.
pub struct ModelCache {
    cache: Arc<Mutex<CacheStorage>>,
}

impl ModelCache {
    /// Create a new empty model cache.
    pub fn new() -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheStorage> {
        // A panic while holding the lock cannot leave the map half-written.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get or create a model from the cache.
    ///
    /// If a live model with the given key exists it is returned; otherwise
    /// `loader` builds a new instance which is then cached.
    ///
    /// # Arguments
    /// * `key` - A unique identifier for this model variant (e.g., "bert-base-uncased-Cpu")
    /// * `loader` - A function that creates a new model instance if not cached
    pub fn get_or_create<M, F>(&self, key: &str, loader: F) -> Result<Arc<M>>
    where
        M: Send + Sync + 'static,
        F: FnOnce() -> Result<M>,
    {
        let cache_key = (TypeId::of::<M>(), key.to_string());

        {
            let mut cache = self.lock();
            if let Some(boxed) = cache.get(&cache_key) {
                if let Some(strong) = boxed
                    .downcast_ref::<Weak<M>>()
                    .and_then(|weak| weak.upgrade())
                {
                    tracing::debug!(key, "model cache hit");
                    return Ok(strong);
                }
                cache.remove(&cache_key);
            }
        }

        tracing::debug!(key, "model cache miss, loading");
        let model = Arc::new(loader()?);

        {
            let mut cache = self.lock();
            let weak: Weak<M> = Arc::downgrade(&model);
            cache.insert(cache_key, Box::new(weak));
        }

        Ok(model)
    }

    /// Clear all cached models.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cache entries, including ones whose model was already dropped.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_MODEL_CACHE: once_cell::sync::Lazy<ModelCache> =
    once_cell::sync::Lazy::new(ModelCache::new);

/// Get a reference to the global model cache.
pub fn global_cache() -> &'static ModelCache {
    &GLOBAL_MODEL_CACHE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct TestModel {
        id: String,
    }

    #[test]
    fn test_cache_returns_same_instance() {
        let cache = ModelCache::new();
        let model1 = cache
            .get_or_create::<TestModel, _>("test-model", || {
                Ok(TestModel {
                    id: "original".to_string(),
                })
            })
            .unwrap();
        let model2 = cache
            .get_or_create::<TestModel, _>("test-model", || {
                Ok(TestModel {
                    id: "new".to_string(),
                })
            })
            .unwrap();

        assert_eq!(model2.id, "original");
        assert!(Arc::ptr_eq(&model1, &model2));
    }

    #[test]
    fn test_dropped_model_is_reloaded() {
        let cache = ModelCache::new();
        let loads = Cell::new(0);
        let load = || {
            loads.set(loads.get() + 1);
            Ok(TestModel {
                id: format!("load-{}", loads.get()),
            })
        };

        let first = cache.get_or_create::<TestModel, _>("k", load).unwrap();
        assert_eq!(first.id, "load-1");
        drop(first);

        let second = cache.get_or_create::<TestModel, _>("k", load).unwrap();
        assert_eq!(second.id, "load-2");
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn test_different_keys_and_types_are_independent() {
        struct Other;

        let cache = ModelCache::new();
        let a = cache
            .get_or_create::<TestModel, _>("key1", || Ok(TestModel { id: "first".into() }))
            .unwrap();
        let b = cache
            .get_or_create::<TestModel, _>("key2", || Ok(TestModel { id: "second".into() }))
            .unwrap();
        let _c = cache.get_or_create::<Other, _>("key1", || Ok(Other)).unwrap();

        assert_eq!(a.id, "first");
        assert_eq!(b.id, "second");
        assert_eq!(cache.len(), 3);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_loader_error_is_not_cached() {
        let cache = ModelCache::new();
        let err = cache.get_or_create::<TestModel, _>("broken", || {
            Err(crate::core::PipelineError::Unexpected("nope".into()))
        });
        assert!(err.is_err());
        assert!(cache.is_empty());
    }
}
