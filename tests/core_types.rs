use platecount::{
    count_plates, BandInterval, ImageView, InputImage, PipelineConfig, PlateCountError, RgbView,
};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        PlateCountError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        PlateCountError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        PlateCountError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, PlateCountError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn empty_rgb_input_never_reaches_the_counter() {
    let err = RgbView::from_slice(&[], 0, 0).err().unwrap();
    assert_eq!(
        err,
        PlateCountError::InvalidDimensions {
            width: 0,
            height: 0,
        }
    );

    let err = RgbView::from_slice(&[0u8; 5], 2, 1).err().unwrap();
    assert_eq!(err, PlateCountError::BufferTooSmall { needed: 6, got: 5 });
}

#[test]
fn strided_roi_matches_expected_values() {
    let data: Vec<u8> = (0u8..20).collect();
    let view = ImageView::new(&data, 4, 4, 5).unwrap();
    let roi = view.roi(1, 1, 2, 3).unwrap();
    assert_eq!(roi.width(), 2);
    assert_eq!(roi.height(), 3);
    assert_eq!(roi.stride(), 5);
    assert_eq!(roi.row(0).unwrap(), &[6, 7]);
    assert_eq!(roi.row(2).unwrap(), &[16, 17]);
    assert!(view.roi(3, 0, 2, 1).is_err());
}

#[test]
fn single_pixel_images_are_valid_input() {
    let gray = [93u8];
    let view = ImageView::from_slice(&gray, 1, 1).unwrap();
    let input = InputImage::from(view);
    assert_eq!((input.width(), input.height()), (1, 1));
    let count = count_plates(view, &PipelineConfig::default()).unwrap();
    assert_eq!(count.value(), Some(0));

    let rgb = [10u8, 20, 30];
    let view = RgbView::from_slice(&rgb, 1, 1).unwrap();
    assert_eq!(count_plates(view, &PipelineConfig::default()).unwrap().value(), Some(0));
}

#[test]
fn band_interval_keeps_top_above_bottom() {
    assert!(BandInterval::new(3, 2).is_err());
    let band = BandInterval::new(2, 2).unwrap();
    assert_eq!(band.height(), 1);
    assert_eq!(BandInterval::full(10).bottom(), 9);
}
