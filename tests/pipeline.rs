//! End-to-end checks of the numeric pipeline around the engine: image bytes
//! in, ranked class indices out. The engine itself needs the downloaded model
//! and is exercised by the driver, not here.

use ndarray::{Array3, ArrayD};

use resnet_classify::preprocess::{CHANNELS, MEAN, SIDE, STDDEV};
use resnet_classify::validate::{assert_outputs_close, DECIMAL_PLACES};
use resnet_classify::{argmax, postprocess, preprocess, softmax, top_k};

#[test]
fn image_bytes_to_model_input() {
    // A synthetic image with a distinct constant value per channel.
    let mut pixels = Array3::<u8>::zeros((SIDE, SIDE, CHANNELS));
    for channel in 0..CHANNELS {
        pixels
            .slice_mut(ndarray::s![.., .., channel])
            .fill(64 * (channel as u8 + 1));
    }

    let input = preprocess(pixels.view());
    assert_eq!(input.shape(), &[1, CHANNELS, SIDE, SIDE]);

    for channel in 0..CHANNELS {
        let value = f32::from(64 * (channel as u8 + 1));
        let expected = (value / 255.0 - MEAN[channel]) / STDDEV[channel];
        let actual = input[[0, channel, 0, 0]];
        assert!(
            (actual - expected).abs() < 1e-6,
            "channel {}: {} != {}",
            channel,
            actual,
            expected
        );
    }
}

#[test]
fn logits_to_ranked_classes() {
    // 1000 logits with a clear winner at class 207 and a runner-up at 208.
    let mut logits = vec![0.0_f32; 1000];
    logits[207] = 9.0;
    logits[208] = 7.0;
    logits[151] = 5.0;

    let output = ArrayD::from_shape_vec(vec![1, 1000], logits).unwrap();
    let probabilities = postprocess(&output);

    assert_eq!(probabilities.len(), 1000);
    let sum: f32 = probabilities.iter().sum();
    assert!((sum - 1.0).abs() < 1e-5);

    assert_eq!(argmax(&probabilities), Some(207));
    assert_eq!(&top_k(&probabilities, 3), &[207, 208, 151]);
}

#[test]
fn softmax_matches_over_the_whole_pipeline() {
    // postprocess is softmax over the flattened output, regardless of the
    // output's (batch, class) shape.
    let logits = [2.0_f32, -1.0, 0.5, 3.5];
    let output = ArrayD::from_shape_vec(vec![1, 4], logits.to_vec()).unwrap();
    assert_eq!(postprocess(&output), softmax(&logits));
}

#[test]
fn reference_comparison_catches_systematic_offsets() {
    let reference = ArrayD::from_shape_vec(vec![1, 5], vec![0.3, -1.1, 2.2, 0.0, 4.4]).unwrap();
    let shifted = reference.mapv(|v| v + 1.0);

    assert!(assert_outputs_close(&reference, &reference.clone(), 0, DECIMAL_PLACES).is_ok());
    assert!(assert_outputs_close(&reference, &shifted, 0, DECIMAL_PLACES).is_err());
}
