mod common;

use common::{Stack, LIGHT};
use platecount::{ImageView, PipelineConfig, PlateCount, PlateCounter, VoteConfig};

/// Rows covering rim `k` of a default-spaced stack, with a margin.
fn rim_rows(stack: &Stack, k: usize) -> std::ops::Range<usize> {
    let cy = (stack.height as f32 - 1.0) * 0.5;
    let first = -stack.spacing * (stack.rims as f32 - 1.0) * 0.5 - stack.thickness * 0.5;
    let top = cy + first + stack.spacing * k as f32;
    (top - 6.0) as usize..(top + stack.thickness + 6.0) as usize
}

fn erase(data: &mut [u8], stack: &Stack, rims: &[usize], cols: std::ops::Range<usize>) {
    for &k in rims {
        for y in rim_rows(stack, k) {
            for x in cols.clone() {
                data[y * stack.width + x] = LIGHT;
            }
        }
    }
}

fn voting() -> PipelineConfig {
    PipelineConfig {
        voting: VoteConfig {
            enabled: true,
            ..VoteConfig::default()
        },
        ..PipelineConfig::default()
    }
}

#[test]
fn clean_stack_is_unanimous() {
    let stack = Stack::default();
    let data = stack.render(0.0);
    let view = ImageView::from_slice(&data, stack.width, stack.height).unwrap();
    let report = PlateCounter::new(voting()).unwrap().count(view).unwrap();
    assert_eq!(report.strip_counts, vec![5, 5, 5]);
    assert_eq!(report.count, PlateCount::Count(5));
}

#[test]
fn one_occluded_strip_is_outvoted() {
    let stack = Stack::default();
    let mut data = stack.render(0.0);
    erase(&mut data, &stack, &[3, 4], 320..stack.width);
    let view = ImageView::from_slice(&data, stack.width, stack.height).unwrap();
    let report = PlateCounter::new(voting()).unwrap().count(view).unwrap();
    assert_eq!(report.strip_counts, vec![5, 5, 3]);
    assert_eq!(report.count, PlateCount::Count(5));
}

#[test]
fn disagreeing_strips_are_indeterminate() {
    let stack = Stack::default();
    let mut data = stack.render(0.0);
    erase(&mut data, &stack, &[2], 160..320);
    erase(&mut data, &stack, &[1, 3], 320..stack.width);
    let view = ImageView::from_slice(&data, stack.width, stack.height).unwrap();
    let report = PlateCounter::new(voting()).unwrap().count(view).unwrap();
    assert_eq!(report.strip_counts, vec![5, 4, 3]);
    assert_eq!(report.count, PlateCount::Indeterminate);
    assert_eq!(report.count.value(), None);
}

#[test]
fn stricter_quorum_rejects_a_bare_majority() {
    let stack = Stack::default();
    let mut data = stack.render(0.0);
    erase(&mut data, &stack, &[0], 0..160);
    let view = ImageView::from_slice(&data, stack.width, stack.height).unwrap();
    let mut cfg = voting();
    cfg.voting.quorum = 3;
    let report = PlateCounter::new(cfg).unwrap().count(view).unwrap();
    assert_eq!(report.strip_counts, vec![4, 5, 5]);
    assert_eq!(report.count, PlateCount::Indeterminate);
}

#[test]
fn uniform_image_votes_zero() {
    let data = vec![90u8; 120 * 80];
    let view = ImageView::from_slice(&data, 120, 80).unwrap();
    let report = PlateCounter::new(voting()).unwrap().count(view).unwrap();
    assert_eq!(report.strip_counts, vec![0, 0, 0]);
    assert_eq!(report.count, PlateCount::Count(0));
}
