mod mlp;

pub(crate) use mlp::DenseRegressor;
