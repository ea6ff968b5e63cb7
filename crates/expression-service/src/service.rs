//! Expression service
//!
//! Orchestrates validation, storage and evaluation of logical expressions.
//! Saving is idempotent on normalized text: the same expression saved twice
//! yields the same id and a single stored record.

use crate::storage::ExpressionStore;
use expression_validator::{preprocess, Evaluator, Validator};
use exprguard_common::{Bindings, Error, Expression, Result};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

pub struct ExpressionService {
    store: Arc<dyn ExpressionStore>,
    validator: Validator,
    evaluator: Evaluator,
}

impl ExpressionService {
    pub fn new(store: Arc<dyn ExpressionStore>) -> Self {
        Self {
            store,
            validator: Validator::new(),
            evaluator: Evaluator::new(),
        }
    }

    /// Validate raw expression text without storing it
    pub fn validate_expression(&self, text: &str) -> Result<()> {
        self.validator.validate(text)
    }

    /// Save an expression, or return the id of an existing one with the same
    /// normalized text
    ///
    /// An existing record is returned untouched, even if `name` differs.
    pub async fn save_expression(&self, name: &str, text: &str) -> Result<String> {
        if name.trim().is_empty() {
            return Err(Error::invalid_argument("Name cannot be blank"));
        }

        let normalized = preprocess(text)?;
        self.validator.validate_normalized(&normalized)?;

        if let Some(existing) = self.store.find_by_text(&normalized).await? {
            debug!("Expression already stored with ID: {}", existing.id);
            return Ok(existing.id);
        }

        let id = Uuid::new_v4().to_string();
        let stored = self
            .store
            .insert(Expression::new(id, name.to_string(), normalized))
            .await?;

        info!("Saved expression '{}' with ID: {}", stored.name, stored.id);
        Ok(stored.id)
    }

    /// All stored expressions
    pub async fn list_all(&self) -> Result<Vec<Expression>> {
        self.store.list_all().await
    }

    /// Fetch a stored expression
    pub async fn get_expression_by_id(&self, id: &str) -> Result<Expression> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Evaluate a stored expression against `bindings`
    pub async fn evaluate_expression(&self, id: &str, bindings: &Bindings) -> Result<bool> {
        if id.is_empty() {
            return Err(Error::invalid_argument("ID cannot be null or empty"));
        }

        let expression = self.get_expression_by_id(id).await?;
        info!("Fetched expression: {}", expression.text);

        if bindings.is_empty() {
            return Err(Error::invalid_argument("Variables cannot be null or empty"));
        }
        info!("Variables for evaluation: {:?}", bindings);

        self.evaluator
            .evaluate(&expression.text, bindings)
            .inspect_err(|e| error!("Evaluation of {} failed: {:?}", id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use exprguard_common::VariableValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Memory store that counts inserts
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        inserts: AtomicUsize,
    }

    #[async_trait]
    impl ExpressionStore for CountingStore {
        async fn find_by_text(&self, text: &str) -> Result<Option<Expression>> {
            self.inner.find_by_text(text).await
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Expression>> {
            self.inner.find_by_id(id).await
        }

        async fn insert(&self, expression: Expression) -> Result<Expression> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(expression).await
        }

        async fn list_all(&self) -> Result<Vec<Expression>> {
            self.inner.list_all().await
        }
    }

    fn bindings(pairs: &[(&str, i64)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), VariableValue::Integer(*v)))
            .collect()
    }

    #[tokio::test]
    async fn test_save_new_expression() {
        let store = Arc::new(CountingStore::default());
        let service = ExpressionService::new(store.clone());

        let id = service
            .save_expression("TestExpression", "(x > 5 && y < 10)")
            .await
            .unwrap();

        let stored = service.get_expression_by_id(&id).await.unwrap();
        assert_eq!(stored.name, "TestExpression");
        assert_eq!(stored.text, "(x > 5 && y < 10)");
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_save_existing_returns_same_id() {
        let store = Arc::new(CountingStore::default());
        let service = ExpressionService::new(store.clone());

        let first = service.save_expression("First", "(x > 5 && y < 10)").await.unwrap();
        let second = service.save_expression("Second", "(x > 5 && y < 10)").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
        assert_eq!(service.get_expression_by_id(&first).await.unwrap().name, "First");
    }

    #[tokio::test]
    async fn test_save_dedupes_on_normalized_text() {
        let store = Arc::new(CountingStore::default());
        let service = ExpressionService::new(store.clone());

        let first = service.save_expression("a", "x > 5 AND y < 10").await.unwrap();
        let second = service.save_expression("b", "  x > 5 && y < 10 ").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.get_expression_by_id(&first).await.unwrap().text, "x > 5 && y < 10");
    }

    #[tokio::test]
    async fn test_save_rejects_invalid() {
        let store = Arc::new(CountingStore::default());
        let service = ExpressionService::new(store.clone());

        let err = service.save_expression("bad", "x = 5").await.unwrap_err();
        assert!(matches!(err, Error::InvalidSyntax(_)));

        let err = service.save_expression("  ", "x == 5").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = service.save_expression("empty", "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_id() {
        let service = ExpressionService::new(Arc::new(MemoryStore::new()));
        let err = service.get_expression_by_id("nope").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_evaluate_stored_expression() {
        let service = ExpressionService::new(Arc::new(MemoryStore::new()));
        let id = service.save_expression("t", "(x > 5 && y < 10)").await.unwrap();

        assert!(service
            .evaluate_expression(&id, &bindings(&[("x", 6), ("y", 5)]))
            .await
            .unwrap());
        assert!(!service
            .evaluate_expression(&id, &bindings(&[("x", 3), ("y", 15)]))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_evaluate_missing_variable() {
        let service = ExpressionService::new(Arc::new(MemoryStore::new()));
        let id = service.save_expression("t", "(x > 5 && y < 10)").await.unwrap();

        let err = service
            .evaluate_expression(&id, &bindings(&[("x", 6)]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Evaluation(_)));
        assert!(err.to_string().contains("Error during expression evaluation"));
    }

    #[tokio::test]
    async fn test_evaluate_argument_checks() {
        let service = ExpressionService::new(Arc::new(MemoryStore::new()));
        let id = service.save_expression("t", "x > 5").await.unwrap();

        let err = service.evaluate_expression("", &bindings(&[("x", 6)])).await.unwrap_err();
        assert_eq!(err.to_string(), "ID cannot be null or empty");

        let err = service.evaluate_expression("missing", &bindings(&[("x", 6)])).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = service.evaluate_expression(&id, &Bindings::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Variables cannot be null or empty");
    }

    #[tokio::test]
    async fn test_list_all() {
        let service = ExpressionService::new(Arc::new(MemoryStore::new()));
        service.save_expression("one", "x > 1").await.unwrap();
        service.save_expression("two", "x > 2").await.unwrap();
        service.save_expression("again", "x > 1").await.unwrap();

        let names: Vec<String> = service.list_all().await.unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["one", "two"]);
    }
}
