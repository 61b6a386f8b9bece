use anyhow::{ensure, Result};
use candle_core::{DType, Tensor};

/// Attention-masked mean over the time axis, then L2 normalize. `[B,T,H] -> [B,H]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let dims = hidden.dims();
    ensure!(dims.len() == 3, "hidden shape must be [B,T,H], got {:?}", dims);

    let mask = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?;
    let mask_broadcast = mask.unsqueeze(2)?.broadcast_as(hidden.shape())?;
    let masked = (hidden * &mask_broadcast)?;
    let sum = masked.sum(1)?;
    let lengths = mask.sum(1)?.unsqueeze(1)?.to_dtype(sum.dtype())?;
    let mean = sum.broadcast_div(&lengths)?;
    l2_normalize(&mean)
}

/// First-token (CLS) representation, then L2 normalize. `[B,T,H] -> [B,H]`.
pub fn cls_l2(hidden: &Tensor) -> Result<Tensor> {
    let dims = hidden.dims();
    ensure!(dims.len() == 3, "hidden shape must be [B,T,H], got {:?}", dims);
    let cls = hidden.narrow(1, 0, 1)?.squeeze(1)?;
    l2_normalize(&cls)
}

pub fn l2_normalize(v: &Tensor) -> Result<Tensor> {
    let eps_val = match v.dtype() { DType::F16 | DType::BF16 => 1e-6f32, _ => 1e-12f32 };
    let eps = Tensor::new(&[eps_val], v.device())?.to_dtype(v.dtype())?.unsqueeze(0)?;
    let norm = v.sqr()?.sum_keepdim(1)?.sqrt()?.broadcast_add(&eps)?;
    Ok(v.broadcast_div(&norm)?)
}
