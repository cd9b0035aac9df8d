/*
 * @Author       : 老董
 * @Date         : 2025-01-21
 * @Description  : 模型参数的保存与加载（bincode 二进制格式）
 *
 * 每个参数保存为一条 (名称, 张量) 记录，加载时按顺序逐条核对名称与形状，
 * 全部核对通过后才写入参数值。
 */

use super::{GraphError, Var};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Serialize, Deserialize)]
struct ParamRecord {
    name: String,
    value: Tensor,
}

/// 把参数的当前值写入`writer`
pub fn save_params<W: Write>(params: &[Var], writer: W) -> Result<(), GraphError> {
    let records = params
        .iter()
        .map(|param| {
            let value = param.value()?.ok_or_else(|| {
                GraphError::ComputationError(format!("参数{}没有值，无法保存", param.name()))
            })?;
            Ok(ParamRecord {
                name: param.name(),
                value,
            })
        })
        .collect::<Result<Vec<_>, GraphError>>()?;
    bincode::serialize_into(writer, &records)
        .map_err(|e| GraphError::Serialization(format!("保存参数失败：{e}")))?;
    log::debug!("已保存{}个参数", records.len());
    Ok(())
}

/// 从`reader`读取参数值并写回`params`。数量、名称或形状不一致时报错且不修改任何参数
pub fn load_params<R: Read>(params: &[Var], reader: R) -> Result<(), GraphError> {
    let records: Vec<ParamRecord> = bincode::deserialize_from(reader)
        .map_err(|e| GraphError::Serialization(format!("加载参数失败：{e}")))?;
    if records.len() != params.len() {
        return Err(GraphError::InvalidOperation(format!(
            "文件中有{}个参数，但模型有{}个",
            records.len(),
            params.len()
        )));
    }
    for (param, record) in params.iter().zip(&records) {
        let name = param.name();
        if name != record.name {
            return Err(GraphError::InvalidOperation(format!(
                "参数名称不一致：模型中为{name}，文件中为{}",
                record.name
            )));
        }
        let shape = param.shape();
        if shape.as_slice() != record.value.shape() {
            return Err(GraphError::ShapeMismatch {
                expected: shape,
                got: record.value.shape().to_vec(),
                message: format!("参数{name}的形状与文件中的不一致"),
            });
        }
    }
    for (param, record) in params.iter().zip(records) {
        param.set_value(&record.value)?;
    }
    Ok(())
}
