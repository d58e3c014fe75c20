//! Var的扩展运算trait。
//!
//! 按关注点拆分为激活函数、矩阵运算与损失函数三组，
//! 用户import对应trait后即可在Var上链式调用。

mod activation;
mod loss;
mod matrix;

pub use activation::VarActivationOps;
pub use loss::VarLossOps;
pub use matrix::VarMatrixOps;
