use candle_core::{DType, Device, Tensor};
use catalog_embed::masked_mean_l2;

#[test]
fn masked_mean_l2_ignores_padding_per_row() {
    let dev = Device::Cpu;
    // Two sequences of two tokens, hidden dim 2. Row 0 keeps both tokens, row 1 only the first.
    let h = Tensor::from_slice(
        &[1.0f32, 0.0, 0.0, 1.0, /* row 1 */ 3.0, 4.0, 9.0, 9.0],
        (2, 2, 2),
        &dev,
    )
    .unwrap();
    let mask = Tensor::from_slice(&[1u32, 1, 1, 0], (2, 2), &dev)
        .unwrap()
        .to_dtype(DType::F32)
        .unwrap();
    let out: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).unwrap().to_vec2().unwrap();

    let s = 0.5f32.sqrt();
    assert!((out[0][0] - s).abs() < 1e-5 && (out[0][1] - s).abs() < 1e-5);
    assert!((out[1][0] - 0.6).abs() < 1e-5 && (out[1][1] - 0.8).abs() < 1e-5);
}

#[test]
fn masked_mean_l2_all_padding_row_is_finite() {
    let dev = Device::Cpu;
    let h = Tensor::ones((1, 3, 4), DType::F32, &dev).unwrap();
    let mask = Tensor::zeros((1, 3), DType::F32, &dev).unwrap();
    let out: Vec<Vec<f32>> = masked_mean_l2(&h, &mask).unwrap().to_vec2().unwrap();
    assert!(out[0].iter().all(|x| x.is_finite()));
}
