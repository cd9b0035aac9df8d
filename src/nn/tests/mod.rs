mod dropout;
mod layer;
mod optimizer;
mod var_ops;
