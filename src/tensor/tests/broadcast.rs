use crate::tensor::Tensor;

#[test]
fn test_broadcast_shape() {
    assert_eq!(Tensor::broadcast_shape(&[2, 3], &[1, 3]), Some(vec![2, 3]));
    assert_eq!(Tensor::broadcast_shape(&[2, 3], &[3]), Some(vec![2, 3]));
    assert_eq!(
        Tensor::broadcast_shape(&[4, 1, 5, 5], &[1, 3, 1, 1]),
        Some(vec![4, 3, 5, 5])
    );
    assert_eq!(Tensor::broadcast_shape(&[1, 1], &[2, 2]), Some(vec![2, 2]));
    assert_eq!(Tensor::broadcast_shape(&[2, 3], &[2, 2]), None);
}

#[test]
fn test_sum_to_shape_leading_axis() {
    let t = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(t.sum_to_shape(&[3]), Tensor::new(&[5., 7., 9.], &[3]));
    assert_eq!(t.sum_to_shape(&[1, 3]), Tensor::new(&[5., 7., 9.], &[1, 3]));
    assert_eq!(t.sum_to_shape(&[2, 1]), Tensor::new(&[6., 15.], &[2, 1]));
    assert_eq!(t.sum_to_shape(&[1, 1]), Tensor::new(&[21.], &[1, 1]));
}

#[test]
fn test_sum_to_shape_channel_bias() {
    let t = Tensor::ones(&[2, 3, 2, 2]);
    let reduced = t.sum_to_shape(&[1, 3, 1, 1]);
    assert_eq!(reduced, Tensor::full(8.0, &[1, 3, 1, 1]));
}

#[test]
fn test_sum_to_shape_same_shape_is_identity() {
    let t = Tensor::new(&[1., 2.], &[1, 2]);
    assert_eq!(t.sum_to_shape(&[1, 2]), t);
}

#[test]
fn test_reshape_and_transpose() {
    let t = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let tt = t.transpose();
    assert_eq!(tt.shape(), &[3, 2]);
    assert_eq!(tt.to_vec(), vec![1., 4., 2., 5., 3., 6.]);
    assert_eq!(tt.reshape(&[6]).to_vec(), vec![1., 4., 2., 5., 3., 6.]);
}
