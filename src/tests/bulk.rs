use crate::error::BulkError;
use crate::types::MetricKind;
use crate::BulkWindowView;

const DATA: [f64; 6] = [4.0, 1.0, 3.0, 8.0, 2.0, 6.0];

#[test]
fn rejects_degenerate_windows() {
    assert_eq!(
        BulkWindowView::new(&DATA, 0).err(),
        Some(BulkError::InvalidWindow { window: 0, len: 6 })
    );
    assert_eq!(
        BulkWindowView::new(&DATA, 7).err(),
        Some(BulkError::InvalidWindow { window: 7, len: 6 })
    );
}

#[test]
fn window_positions_cover_the_whole_input() {
    let view = BulkWindowView::new(&DATA, 3).expect("valid view");
    assert_eq!(view.len(), 4);
    let windows: Vec<&[f64]> = view.windows().collect();
    assert_eq!(windows[0], &[4.0, 1.0, 3.0]);
    assert_eq!(windows[3], &[8.0, 2.0, 6.0]);
}

#[test]
fn mean_high_low_per_window_position() {
    let view = BulkWindowView::new(&DATA, 2).expect("valid view");
    assert_eq!(view.mean(), vec![2.5, 2.0, 5.5, 5.0, 4.0]);
    assert_eq!(view.high(), vec![4.0, 3.0, 8.0, 8.0, 6.0]);
    assert_eq!(view.low(), vec![1.0, 1.0, 3.0, 2.0, 2.0]);
}

#[test]
fn full_length_window_collapses_to_a_single_value() {
    let view = BulkWindowView::new(&DATA, 6).expect("valid view");
    assert_eq!(view.len(), 1);
    assert_eq!(view.mean(), vec![4.0]);
    assert_eq!(view.high(), vec![8.0]);
    assert_eq!(view.low(), vec![1.0]);
}

#[test]
fn apply_dispatches_supported_kinds_and_rejects_the_delta_family() {
    let view = BulkWindowView::new(&DATA, 2).expect("valid view");
    assert_eq!(view.apply(MetricKind::Mean), Ok(view.mean()));
    assert_eq!(view.apply(MetricKind::High), Ok(view.high()));
    assert_eq!(view.apply(MetricKind::Low), Ok(view.low()));
    assert_eq!(
        view.apply(MetricKind::Delta),
        Err(BulkError::UnsupportedMetric {
            kind: MetricKind::Delta
        })
    );
}
