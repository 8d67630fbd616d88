//! Compiler facade and entry points.

use trellis_bytecode::Machine;
use trellis_core::Encoding;

use crate::properties::{PropertyCache, PropertySource};
use crate::publish::{self, PublishedPattern};
use crate::registry::Registry;
use crate::rewrite::{CompiledPattern, Rewriter};
use crate::tree::SyntaxTree;
use crate::{CompileOptions, Error, OptimizerConfig, Result};

/// Long-lived compiler state: the target machine, the property cache and the
/// registry of published classes. All three persist across compiles and are
/// left consistent when a compile fails.
pub struct Compiler<M, P> {
    machine: M,
    properties: PropertyCache<P>,
    registry: Registry,
    optimizer: OptimizerConfig,
}

/// Builder for `Compiler`.
pub struct CompilerBuilder<M, P> {
    machine: M,
    properties: P,
    registry: Registry,
    optimizer: OptimizerConfig,
}

impl<M: Machine, P: PropertySource> CompilerBuilder<M, P> {
    /// Create a new builder with required parameters.
    pub fn new(machine: M, properties: P) -> Self {
        Self {
            machine,
            properties,
            registry: Registry::new(),
            optimizer: OptimizerConfig::default(),
        }
    }

    pub fn optimizer(mut self, config: OptimizerConfig) -> Self {
        self.optimizer = config;
        self
    }

    /// Start from an existing registry. It must describe `machine`.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn build(self) -> Compiler<M, P> {
        Compiler {
            machine: self.machine,
            properties: PropertyCache::new(self.properties),
            registry: self.registry,
            optimizer: self.optimizer,
        }
    }
}

impl<M: Machine, P: PropertySource> Compiler<M, P> {
    pub fn builder(machine: M, properties: P) -> CompilerBuilder<M, P> {
        CompilerBuilder::new(machine, properties)
    }

    /// Rewrite `tree` into a publish-ready pattern. Writes nothing to the machine.
    pub fn compile(&mut self, tree: &SyntaxTree, options: &CompileOptions) -> Result<CompiledPattern> {
        let encoding = Encoding::from_name(&options.encoding)
            .ok_or_else(|| Error::UnsupportedEncoding(options.encoding.clone()))?;
        Rewriter::new(
            tree.clone(),
            encoding,
            options,
            &mut self.properties,
            &self.registry,
        )
        .run()
    }

    /// Write a compiled pattern's classes into the machine and optimize it.
    ///
    /// On `OutOfSpace` the classes published so far stay registered; the
    /// pattern itself can be retried against a fresh machine.
    pub fn publish(&mut self, compiled: &CompiledPattern) -> Result<PublishedPattern> {
        publish::publish(
            compiled,
            &mut self.machine,
            &mut self.registry,
            self.optimizer,
        )
    }

    pub fn compile_and_publish(
        &mut self,
        tree: &SyntaxTree,
        options: &CompileOptions,
    ) -> Result<PublishedPattern> {
        let compiled = self.compile(tree, options)?;
        self.publish(&compiled)
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn optimizer(&self) -> OptimizerConfig {
        self.optimizer
    }

    /// Take back the machine and registry, e.g. to hand the table to a matcher.
    pub fn into_parts(self) -> (M, Registry) {
        (self.machine, self.registry)
    }
}
