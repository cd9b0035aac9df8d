/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : 由层串联而成的模型：前馈网络、自编码器、卷积 K-means
 */

mod auto_encoder;
mod conv_kmeans;
mod feed_forward;

pub use auto_encoder::{AutoEncoder, CorruptionConfig};
pub use conv_kmeans::ConvKMeans;
pub use feed_forward::FeedForward;

use crate::nn::{GraphError, Layer, Var};

/// 依次应用各层，返回每一层的输出
fn propagate(layers: &[Box<dyn Layer>], x: &Var) -> Result<Vec<Var>, GraphError> {
    let mut outputs: Vec<Var> = Vec::with_capacity(layers.len());
    for layer in layers {
        let input = outputs.last().unwrap_or(x);
        let output = layer.apply(input)?;
        outputs.push(output);
    }
    Ok(outputs)
}

/// 各层参数按层顺序拼接
fn collect_parameters(layers: &[Box<dyn Layer>]) -> Vec<Var> {
    layers.iter().flat_map(|layer| layer.parameters()).collect()
}
