//! Explicit binding of UI inputs to chart outputs.
//!
//! A `Callback` ties one component property the page reports changes for (an `Input`) to one
//! component property the server answers with (an `Output`). The page posts a change, the
//! registry finds the callback registered for that input and runs it synchronously, exactly once.

use crate::charts::Figure;
use crate::controller::{Controller, SortOrder};
use crate::Result;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::str::FromStr;
use tracing::debug;

/// The component id of the ordering radio control.
pub const ORDER_INPUT_ID: &str = "orden_paises";

/// The component id of the country ranking chart.
pub const COUNTRY_FIGURE_ID: &str = "fig_pais";

/// A component property, e.g. the `value` of `orden_paises`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub id: String,
    pub property: String,
}

impl Dependency {
    pub fn new(id: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            property: property.into(),
        }
    }
}

/// A change reported by the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputChange {
    pub id: String,
    pub property: String,
    pub value: serde_json::Value,
}

impl InputChange {
    fn dependency(&self) -> Dependency {
        Dependency::new(&self.id, &self.property)
    }
}

/// The body the page posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub input: InputChange,
}

/// The answer to an `UpdateRequest`: the output to replace and its new figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateResponse {
    pub output: Dependency,
    pub value: Figure,
}

/// Errors that are the caller's fault rather than the server's.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum InputError {
    /// No callback listens to this input.
    UnknownInput(Dependency),
    /// The input value is not one the control can produce.
    InvalidValue(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::UnknownInput(dep) => {
                write!(f, "No callback is registered for {}.{}", dep.id, dep.property)
            }
            InputError::InvalidValue(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for InputError {}

type Handler = Box<dyn Fn(&serde_json::Value) -> Result<Figure> + Send + Sync>;

pub struct Callback {
    input: Dependency,
    output: Dependency,
    handler: Handler,
}

impl Debug for Callback {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("input", &self.input)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

/// The registered callbacks, at most one per input.
#[derive(Debug, Default)]
pub struct Callbacks {
    callbacks: Vec<Callback>,
}

impl Callbacks {
    /// The dashboard's only binding: `orden_paises.value` drives `fig_pais.figure`.
    pub fn new(controller: Controller) -> Self {
        let mut callbacks = Self::default();
        callbacks.register(
            Dependency::new(ORDER_INPUT_ID, "value"),
            Dependency::new(COUNTRY_FIGURE_ID, "figure"),
            move |value| {
                let order = parse_order(value)?;
                controller.recompute(order)
            },
        );
        callbacks
    }

    /// Binds `input` to `output`. A later registration for the same input replaces the earlier
    /// one.
    pub fn register<F>(&mut self, input: Dependency, output: Dependency, handler: F)
    where
        F: Fn(&serde_json::Value) -> Result<Figure> + Send + Sync + 'static,
    {
        self.callbacks.retain(|c| c.input != input);
        self.callbacks.push(Callback {
            input,
            output,
            handler: Box::new(handler),
        });
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Runs the callback registered for the changed input.
    pub fn dispatch(&self, change: &InputChange) -> Result<UpdateResponse> {
        let input = change.dependency();
        let callback = self
            .callbacks
            .iter()
            .find(|c| c.input == input)
            .ok_or_else(|| anyhow!(InputError::UnknownInput(input.clone())))?;
        debug!(
            "Dispatching {}.{} = {} to {}.{}",
            input.id, input.property, change.value, callback.output.id, callback.output.property
        );
        let value = (callback.handler)(&change.value)?;
        Ok(UpdateResponse {
            output: callback.output.clone(),
            value,
        })
    }
}

fn parse_order(value: &serde_json::Value) -> Result<SortOrder> {
    let raw = value
        .as_str()
        .ok_or_else(|| InputError::InvalidValue(format!("Expected a string, got {value}")))?;
    SortOrder::from_str(raw)
        .map_err(|_| InputError::InvalidValue(format!("Unknown ordering '{raw}'")))
        .context("Unable to recompute the country ranking")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::countries;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn callbacks() -> Callbacks {
        let dataset = countries(&[("A", "5"), ("B", "20"), ("C", "10")]);
        Callbacks::new(Controller::new(Arc::new(dataset)))
    }

    fn change(id: &str, value: serde_json::Value) -> InputChange {
        InputChange {
            id: id.to_string(),
            property: "value".to_string(),
            value,
        }
    }

    #[test]
    fn test_dispatch_order() {
        let callbacks = callbacks();
        assert_eq!(callbacks.len(), 1);
        let response = callbacks
            .dispatch(&change(ORDER_INPUT_ID, json!("asc")))
            .unwrap();
        assert_eq!(response.output, Dependency::new(COUNTRY_FIGURE_ID, "figure"));
        assert_eq!(
            response.value.title(),
            "Top 10 Países con Menor Inversión Aprobada"
        );
        let bar = response.value.data()[0].as_bar().unwrap();
        assert_eq!(bar.x.labels().unwrap(), &["A", "C", "B"]);
    }

    #[test]
    fn test_unknown_input() {
        let err = callbacks()
            .dispatch(&change("orden_industrias", json!("asc")))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InputError>(),
            Some(InputError::UnknownInput(_))
        ));
    }

    #[test]
    fn test_invalid_value() {
        for value in [json!("sideways"), json!(3), json!(null)] {
            let err = callbacks()
                .dispatch(&change(ORDER_INPUT_ID, value))
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<InputError>(),
                Some(InputError::InvalidValue(_))
            ));
        }
    }

    #[test]
    fn test_handler_runs_once_per_change() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let dataset = Arc::new(countries(&[("A", "1")]));
        let controller = Controller::new(dataset);
        let mut callbacks = Callbacks::default();
        callbacks.register(
            Dependency::new("x", "value"),
            Dependency::new("y", "figure"),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                controller.recompute(SortOrder::Desc)
            },
        );
        callbacks.dispatch(&change("x", json!("desc"))).unwrap();
        callbacks.dispatch(&change("x", json!("asc"))).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_register_replaces() {
        let mut callbacks = callbacks();
        let controller = Controller::new(Arc::new(countries(&[("A", "1")])));
        callbacks.register(
            Dependency::new(ORDER_INPUT_ID, "value"),
            Dependency::new("other", "figure"),
            move |_| controller.recompute(SortOrder::Asc),
        );
        assert_eq!(callbacks.len(), 1);
        let response = callbacks
            .dispatch(&change(ORDER_INPUT_ID, json!("desc")))
            .unwrap();
        assert_eq!(response.output.id, "other");
    }
}
