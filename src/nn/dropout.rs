/*
 * @Author       : 老董
 * @Date         : 2026-02-03
 * @Description  : Dropout 掩码与输入加噪（denoising）
 *
 * 掩码是图中的 Bernoulli 节点：每次前向传播都会重新采样，
 * 其随机数生成器由调用方传入的 rng 派生种子，保证可复现。
 */

use super::{Graph, GraphError, Var};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 生成形状为`shape`的 dropout 掩码：每个元素以概率`prob`置0，否则为1。
/// `prob`必须在[0, 1]区间内
pub fn dropout<R: Rng + ?Sized>(
    graph: &Graph,
    shape: &[usize],
    prob: f32,
    rng: &mut R,
) -> Result<Var, GraphError> {
    if !(0.0..=1.0).contains(&prob) {
        return Err(GraphError::InvalidOperation(format!(
            "dropout 概率必须在[0, 1]区间内，得到{prob}"
        )));
    }
    let node_rng = StdRng::seed_from_u64(rng.r#gen());
    let node_id = graph
        .inner_mut()
        .new_bernoulli_node(shape, 1.0 - prob, node_rng, None)?;
    Ok(graph.wrap_node_id(node_id))
}

/// 为每个形状各生成一个 dropout 掩码，它们共用同一个`prob`
pub fn multi_dropout<R: Rng + ?Sized>(
    graph: &Graph,
    shapes: &[&[usize]],
    prob: f32,
    rng: &mut R,
) -> Result<Vec<Var>, GraphError> {
    shapes
        .iter()
        .map(|shape| dropout(graph, shape, prob, rng))
        .collect()
}

/// 有掩码时返回`x * mask`，否则原样返回`x`
pub fn apply_dropout(x: &Var, mask: Option<&Var>) -> Result<Var, GraphError> {
    match mask {
        Some(mask) => x.try_mul(mask),
        None => Ok(x.clone()),
    }
}

/// 以`level`的概率把`x`的每个元素置0
pub fn corrupt_input<R: Rng + ?Sized>(x: &Var, level: f32, rng: &mut R) -> Result<Var, GraphError> {
    let mask = dropout(&x.get_graph(), &x.shape(), level, rng)?;
    apply_dropout(x, Some(&mask))
}
