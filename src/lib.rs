#![doc(html_favicon_url = "\">
<script defer src=\"https://cdn.jsdelivr.net/npm/katex@0.10.1/dist/katex.min.js\" integrity=\"sha384-2BKqo+exmr9su6dir+qCw08N2ZKRucY4PrGQPPWU1A7FtlCGjmEGFqXCv5nyM5Ij\" crossorigin=\"anonymous\"></script>
<script>
document.addEventListener(\"DOMContentLoaded\", function () {
	let to_do = [];
	for (let e of document.getElementsByTagName(\"code\")) {
		if (e.classList.contains(\"language-math\")) {
			to_do.push(function () {
				let x = document.createElement('p');
				katex.render(e.innerText, x, {displayMode: true, throwOnError: false});
				e.parentNode.parentNode.replaceChild(x, e.parentNode);
			});
		} else {
			let n = e.nextSibling; let p = e.previousSibling;
			if (n && p && /^\\$/.test(n.data) && /\\$$/.test(p.data)) {
				to_do.push(function () {
					let n = e.nextSibling; let p = e.previousSibling;
					let x = document.createElement('span');
					katex.render(e.innerText, x, {throwOnError: false});
					e.parentNode.replaceChild(x, e);
					n.splitText(1); n.remove();
					p.splitText(p.data.length - 1).remove();
				});
			}
		}
	}
	for (let f of to_do) f();
});
</script>
<link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/katex@0.10.1/dist/katex.min.css\" integrity=\"sha384-dbVIfZGuN1Yq7/1Ocstc1lUEm+AT+/rCkibIcC/OmWo5f0EA48Vf8CytHzGrSwbQ\" crossorigin=\"anonymous")]

//! # altro
//!
//! A trajectory optimizer for constrained nonlinear discrete-time systems:
//! a Gauss-Newton differential dynamic programming (iLQR) inner loop nested
//! inside an outer Augmented Lagrangian pass over general equality and
//! inequality constraints, with an optional infeasible-start mode for
//! seeding the solve from a dynamically inconsistent guess.
//!
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! altro = "0.1"
//! ```
//!
//! A problem is assembled from a [`model::Dynamics`] implementation, a
//! [`cost::StageCost`], an optional [`constraint::ConstraintSet`], an
//! [`model::IntegratorRule`], and a horizon/step size/initial state:
//!
//!``` rust
//! use altro::constraint::ConstraintSet;
//! use altro::cost::LqrCost;
//! use altro::model::double_integrator::DoubleIntegrator;
//! use altro::model::IntegratorRule;
//! use altro::options::SolverOptions;
//! use altro::problem::Problem;
//! use altro::solver::{CancelToken, NullObserver, Solver};
//! use nalgebra::{DMatrix, DVector};
//!
//! let model = DoubleIntegrator::new(1);
//! let cost = LqrCost::new(
//!     DMatrix::identity(2, 2),
//!     DMatrix::identity(1, 1) * 0.1,
//!     DMatrix::identity(2, 2) * 10.0,
//!     DVector::from_vec(vec![1.0, 0.0]),
//! );
//! let x_init = DVector::zeros(2);
//! let problem = Problem::new(
//!     model,
//!     cost,
//!     ConstraintSet::new(),
//!     IntegratorRule::Rk4,
//!     20,
//!     0.1,
//!     x_init,
//! ).unwrap();
//!
//! let solver = Solver::new(problem, SolverOptions::default()).unwrap();
//! let x_guess = vec![DVector::zeros(2); 20];
//! let u_guess = vec![DVector::zeros(1); 19];
//! let cancel = CancelToken::new();
//! let mut observer = NullObserver;
//! let (outcome, trajectory) = solver.solve(x_guess, u_guess, &cancel, &mut observer).unwrap();
//! assert_eq!(trajectory.steps(), 19);
//! println!("{:?}", outcome.status);
//! ```
//!
//! Enabling the `serde` feature makes [`options::SolverOptions`] and the
//! solver's returned diagnostics ([`solver::SolveOutcome`],
//! [`solver::SolveStatus`], [`solver::SolveHistory`]) serializable, for
//! logging a run's configuration and result alongside each other.

pub mod backward_pass;
pub mod constraint;
pub mod cost;
pub mod error;
pub mod forward_pass;
pub mod model;
pub mod options;
pub mod problem;
pub mod scalar;
pub mod solver;
pub mod trajectory;

pub use error::{AltroError, Result};
pub use options::SolverOptions;
pub use problem::Problem;
pub use solver::Solver;
