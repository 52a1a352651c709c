//! # Fresnel Core
//!
//! Frequency-domain boundary sources for finite-element electromagnetics.
//! This crate computes the surface current source term of a time-harmonic
//! Maxwell solve and registers it with the host's right-hand-side assembly.
//!
//! ## Architecture
//!
//! A boundary's per-axis field specification is resolved once into a
//! [`field::ComplexVectorField`]. The [`scaling::FrequencyScaled`] wrapper
//! multiplies it by $-i\omega$ and projects onto the real or imaginary pass.
//! [`boundary::SurfaceCurrent`] decides applicability and appends one
//! [`assembly::BoundaryLinearForm`] per pass to an
//! [`assembly::AssemblyTarget`].
//!
//! ## Modules
//!
//! - [`types`]: Points, complex vectors, frequency context.
//! - [`field`]: Vector field specification, namespace, evaluation.
//! - [`scaling`]: The $-i\omega$ factor and real/imaginary passes.
//! - [`assembly`]: Assembly target interface and an in-memory collector.
//! - [`physics`]: Frequency source and a minimal physics model.
//! - [`boundary`]: Boundary condition trait and the surface current source.

pub mod assembly;
pub mod boundary;
pub mod field;
pub mod physics;
pub mod scaling;
pub mod types;
