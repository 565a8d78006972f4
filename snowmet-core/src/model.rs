//! Model builder and runtime.
//!
//! A [`Model`] owns a [`NodeFields`] store and an ordered list of components.
//! [`ModelBuilder`] works out that order from the fields each component reads and
//! writes: a component that produces a field is always stepped before the
//! components that read it.
//!
//! Every input must have a source when the model is built. A field may be
//!
//! - supplied by the caller,
//! - produced by another component, or
//! - a registered variable with a default value, in which case the builder creates it.
//!
//! Anything else is reported as [`SnowMetError::MissingField`] before the first step.

use crate::component::Component;
use crate::errors::{SnowMetError, SnowMetResult};
use crate::field::{FieldStore, NodeFields};
use crate::variable::VARIABLE_REGISTRY;
use ndarray::Array1;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Build a new model from a set of components.
pub struct ModelBuilder {
    fields: NodeFields,
    components: Vec<Box<dyn Component>>,
}

impl ModelBuilder {
    /// Create a builder with an empty field store of `number_of_nodes` nodes
    pub fn new(number_of_nodes: usize) -> Self {
        Self::from_fields(NodeFields::new(number_of_nodes))
    }

    /// Create a builder around an existing field store
    pub fn from_fields(fields: NodeFields) -> Self {
        Self {
            fields,
            components: vec![],
        }
    }

    /// The field store the model will own.
    ///
    /// Components that seed their own defaults at construction take this store.
    pub fn fields_mut(&mut self) -> &mut NodeFields {
        &mut self.fields
    }

    pub fn fields(&self) -> &NodeFields {
        &self.fields
    }

    /// Add a driving field
    pub fn with_field(mut self, name: &str, values: Array1<f64>) -> SnowMetResult<Self> {
        self.fields.set(name, values)?;
        Ok(self)
    }

    /// Register a component with the model
    pub fn with_component(mut self, component: Box<dyn Component>) -> Self {
        self.components.push(component);
        self
    }

    /// Validate the component inputs and order the components by dependency.
    pub fn build(mut self) -> SnowMetResult<Model> {
        let mut graph: DiGraph<usize, String> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.components.len())
            .map(|i| graph.add_node(i))
            .collect();

        let mut producers: HashMap<String, NodeIndex> = HashMap::new();
        for (component, node) in self.components.iter().zip(&nodes) {
            for name in component.output_names() {
                if producers.insert(name.clone(), *node).is_some() {
                    return Err(SnowMetError::Error(format!(
                        "Field '{}' is produced by more than one component",
                        name
                    )));
                }
            }
        }

        for (component, node) in self.components.iter().zip(&nodes) {
            for name in component.input_names() {
                match producers.get(&name) {
                    Some(producer) if producer != node => {
                        graph.update_edge(*producer, *node, name);
                    }
                    Some(_) => {}
                    None if self.fields.has(&name) => {}
                    None => match VARIABLE_REGISTRY.default_for(&name) {
                        Some(default) => {
                            debug!(field = %name, default, "Creating defaulted input");
                            self.fields.add_full(&name, default)?;
                        }
                        None => return Err(SnowMetError::MissingField(name)),
                    },
                }
            }
        }

        let order = toposort(&graph, None)
            .map_err(|cycle| SnowMetError::DependencyCycle(cycle.node_id().index().to_string()))?;

        let mut slots: Vec<Option<Box<dyn Component>>> =
            self.components.into_iter().map(Some).collect();
        let components: Vec<Box<dyn Component>> = order
            .into_iter()
            .filter_map(|node| slots[graph[node]].take())
            .collect();

        info!(
            components = components.len(),
            fields = self.fields.len(),
            nodes = self.fields.number_of_nodes(),
            "Built model"
        );

        Ok(Model {
            fields: self.fields,
            components,
            elapsed: 0.0,
            step_count: 0,
        })
    }
}

/// A coupled set of components stepped over a shared field store.
///
/// Components are stepped in dependency order every time step, so any field a
/// component reads has already been updated by its producer for that step.
#[derive(Debug, Serialize, Deserialize)]
pub struct Model {
    /// Seconds simulated so far
    elapsed: f64,
    step_count: usize,
    fields: NodeFields,
    components: Vec<Box<dyn Component>>,
}

impl Model {
    /// Step every component once by `dt` seconds.
    pub fn run_one_step(&mut self, dt: f64) -> SnowMetResult<()> {
        for component in self.components.iter_mut() {
            component.run_one_step(&mut self.fields, dt)?;
        }
        self.elapsed += dt;
        self.step_count += 1;
        debug!(step = self.step_count, elapsed = self.elapsed, "Model step complete");
        Ok(())
    }

    /// Run `n_steps` steps of `dt` seconds.
    pub fn run(&mut self, n_steps: usize, dt: f64) -> SnowMetResult<()> {
        for _ in 0..n_steps {
            self.run_one_step(dt)?;
        }
        Ok(())
    }

    pub fn fields(&self) -> &NodeFields {
        &self.fields
    }

    /// Mutable access to the store, used to update drivers between steps
    pub fn fields_mut(&mut self) -> &mut NodeFields {
        &mut self.fields
    }

    /// Borrow a field from the model's store
    pub fn get(&self, name: &str) -> SnowMetResult<&Array1<f64>> {
        self.fields.get(name)
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }
}
