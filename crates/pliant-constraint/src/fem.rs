//! FEM tetrahedral strain-energy constraints.
//!
//! The constraint value is the element's strain energy scaled by its rest
//! volume; the gradient is `∇C = V₀ · P(F) · Dm⁻ᵀ` with the first
//! Piola-Kirchhoff stress `P` of the chosen material model.
//!
//! The rest-state edge matrix inverse `Dm⁻¹` is precomputed once at
//! generation time from the undeformed vertex positions and is invariant
//! for the life of the constraint.

use pliant_math::tet::{edge_matrix, tet_volume};
use pliant_math::{Mat3, Vec3};
use pliant_types::constants::DEGENERATE_EPS;
use pliant_types::{PliantError, PliantResult, Real};
use serde::{Deserialize, Serialize};

/// Constitutive model for FEM tet constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FemMaterial {
    /// Saint Venant-Kirchhoff: Green strain, quadratic energy.
    StVk,
    /// Compressible Neo-Hookean with log-determinant volume term.
    NeoHookean,
    /// Linear elasticity on the left Cauchy-Green strain.
    Linear,
}

/// Material parameters for FEM constraint generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FemConfig {
    /// Young's modulus (Pa).
    pub youngs_modulus: Real,
    /// Poisson ratio, must be in (-1, 0.5).
    pub poisson_ratio: Real,
    /// Constitutive model.
    pub material: FemMaterial,
}

impl FemConfig {
    /// Check the material parameter ranges.
    ///
    /// The Poisson bound is open: ν = 0.5 (incompressible) makes the
    /// Lamé λ divide by zero.
    pub fn validate(&self) -> PliantResult<()> {
        if !(self.youngs_modulus > 0.0 && self.youngs_modulus.is_finite()) {
            return Err(PliantError::InvalidMaterial(format!(
                "Young's modulus must be positive and finite, got {}",
                self.youngs_modulus
            )));
        }
        if !(self.poisson_ratio > -1.0 && self.poisson_ratio < 0.5) {
            return Err(PliantError::InvalidMaterial(format!(
                "Poisson ratio must be in (-1, 0.5), got {}",
                self.poisson_ratio
            )));
        }
        Ok(())
    }

    /// First Lamé parameter μ (shear modulus).
    pub fn mu(&self) -> Real {
        self.youngs_modulus / (2.0 * (1.0 + self.poisson_ratio))
    }

    /// Second Lamé parameter λ.
    pub fn lame_lambda(&self) -> Real {
        self.youngs_modulus * self.poisson_ratio
            / ((1.0 + self.poisson_ratio) * (1.0 - 2.0 * self.poisson_ratio))
    }

    /// XPBD compliance for an element of this material.
    ///
    /// Follows the standard choice α = 1/(λ + 2μ): stiffer materials
    /// get smaller compliance.
    pub fn compliance(&self) -> Real {
        1.0 / (self.lame_lambda() + 2.0 * self.mu())
    }
}

/// Precomputed per-element FEM data stored inside the constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FemElement {
    /// Inverse of the rest-state edge matrix Dm.
    pub inv_rest: Mat3,
    /// Rest volume V₀ of the element.
    pub rest_volume: Real,
    /// Constitutive model.
    pub material: FemMaterial,
    /// First Lamé parameter μ.
    pub mu: Real,
    /// Second Lamé parameter λ.
    pub lambda: Real,
}

impl FemElement {
    /// Precompute rest data from the undeformed element.
    ///
    /// Returns `None` for a degenerate (zero-volume) rest element;
    /// such elements cannot carry an FEM constraint.
    pub fn from_rest_state(
        p0: Vec3,
        p1: Vec3,
        p2: Vec3,
        p3: Vec3,
        config: &FemConfig,
    ) -> Option<Self> {
        let m = edge_matrix(p0, p1, p2, p3);
        if m.determinant().abs() < DEGENERATE_EPS {
            return None;
        }
        Some(Self {
            inv_rest: m.inverse(),
            rest_volume: tet_volume(p0, p1, p2, p3),
            material: config.material,
            mu: config.mu(),
            lambda: config.lame_lambda(),
        })
    }

    /// Strain energy and its gradient at the current element configuration.
    ///
    /// Returns `None` when the deformation gradient is singular (collapsed
    /// element) — for Neo-Hookean the log-determinant is undefined there,
    /// and for the other models the gradient carries no useful direction.
    pub fn value_and_gradient(
        &self,
        p0: Vec3,
        p1: Vec3,
        p2: Vec3,
        p3: Vec3,
    ) -> Option<(Real, [Vec3; 4])> {
        let f = edge_matrix(p0, p1, p2, p3) * self.inv_rest;

        let (c, p) = match self.material {
            FemMaterial::StVk => self.stvk(f),
            FemMaterial::NeoHookean => self.neo_hookean(f)?,
            FemMaterial::Linear => self.linear(f),
        };

        let grad = self.rest_volume * p * self.inv_rest.transpose();
        let g0 = grad.col(0);
        let g1 = grad.col(1);
        let g2 = grad.col(2);
        Some((c * self.rest_volume, [g0, g1, g2, -g0 - g1 - g2]))
    }

    /// StVK: `E = (FᵀF − I)/2`, `P = F(2μE + λ tr(E) I)`,
    /// `C = μ tr(EᵀE) + λ/2 tr(E)²`.
    fn stvk(&self, f: Mat3) -> (Real, Mat3) {
        let e = 0.5 * (f.transpose() * f - Mat3::IDENTITY);
        let tr = trace(e);
        let p = f * (2.0 * self.mu * e + Mat3::from_diagonal(Vec3::splat(self.lambda * tr)));
        let c = self.mu * trace(e.transpose() * e) + 0.5 * self.lambda * tr * tr;
        (c, p)
    }

    /// Neo-Hookean: `P = μ(F − F⁻ᵀ) + λ/2 log(I₃) F⁻ᵀ`,
    /// `C = μ/2 (I₁ − log(I₃) − 3) + λ/8 log²(I₃)`.
    fn neo_hookean(&self, f: Mat3) -> Option<(Real, Mat3)> {
        let det = f.determinant();
        if det.abs() < DEGENERATE_EPS || det < 0.0 {
            // Inverted or collapsed element; skip this pass.
            return None;
        }
        let i1 = trace(f * f.transpose());
        let i3 = det * det;
        let log_i3 = i3.ln();
        let f_inv_t = f.inverse().transpose();

        let p = self.mu * (f - f_inv_t) + 0.5 * self.lambda * log_i3 * f_inv_t;
        let c = 0.5 * self.mu * (i1 - log_i3 - 3.0) + 0.125 * self.lambda * log_i3 * log_i3;
        Some((c, p))
    }

    /// Linear: `e = (FFᵀ − I)/2`, `P = 2μe + λ tr(e) I`,
    /// `C = μ tr(e²) + λ/2 tr(e)²`.
    fn linear(&self, f: Mat3) -> (Real, Mat3) {
        let e = 0.5 * (f * f.transpose() - Mat3::IDENTITY);
        let tr = trace(e);
        let p = 2.0 * self.mu * e + Mat3::from_diagonal(Vec3::splat(self.lambda * tr));
        let c = self.mu * trace(e * e) + 0.5 * self.lambda * tr * tr;
        (c, p)
    }
}

#[inline]
fn trace(m: Mat3) -> Real {
    m.x_axis.x + m.y_axis.y + m.z_axis.z
}
