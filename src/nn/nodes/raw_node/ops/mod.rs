mod add;
mod leaky_relu;
mod mat_mul;

pub(in crate::nn) use add::Add;
pub(in crate::nn) use leaky_relu::LeakyReLU;
pub(in crate::nn) use mat_mul::MatMul;
