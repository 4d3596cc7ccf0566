use edgestag_rust::filters::gradient::combine;
use edgestag_rust::filters::kernel::{convolve, Kernel};
use edgestag_rust::filters::padding::{pad, unpad};
use edgestag_rust::{
    Blur, Error, Filter, FilterKind, Pipeline, ResponseBuffer, SampleBuffer, Scharr, Sobel,
};

/// Deterministic pseudo-random image (xorshift).
fn noise_image(rows: usize, cols: usize, seed: u32) -> SampleBuffer {
    let mut state = seed.max(1);
    let mut data = Vec::with_capacity(rows * cols);
    for _ in 0..rows * cols {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        data.push((state >> 24) as u8);
    }
    SampleBuffer::from_vec(rows, cols, data).unwrap()
}

fn all_filters() -> Vec<Box<dyn Filter>> {
    vec![Box::new(Blur::new()), Box::new(Sobel::new()), Box::new(Scharr::new())]
}

#[test]
fn pad_unpad_inverse_on_random_images() {
    for (i, (rows, cols)) in [(1, 1), (1, 9), (7, 1), (3, 3), (31, 17), (64, 65)]
        .into_iter()
        .enumerate()
    {
        let image = noise_image(rows, cols, 11 + i as u32);
        assert_eq!(unpad(&pad(&image).unwrap()).unwrap(), image);
    }
}

#[test]
fn filters_preserve_dimensions() {
    for (rows, cols) in [(1, 1), (1, 5), (5, 1), (2, 3), (40, 23)] {
        let image = noise_image(rows, cols, 7);
        for filter in all_filters() {
            let output = filter.apply(&image).unwrap();
            assert_eq!(output.dim(), (rows, cols), "{} on {rows}x{cols}", filter.name());
        }
    }
}

#[test]
fn filters_are_deterministic_across_thread_pools() {
    let image = noise_image(97, 61, 42);
    let reference: Vec<SampleBuffer> = all_filters()
        .iter()
        .map(|f| f.apply(&image).unwrap())
        .collect();

    for threads in [1, 3, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        let outputs: Vec<SampleBuffer> = pool.install(|| {
            all_filters()
                .iter()
                .map(|f| f.apply(&image).unwrap())
                .collect()
        });
        assert_eq!(outputs, reference, "{threads} threads");
    }
}

#[test]
fn blur_on_constant_field_is_a_no_op() {
    let image = SampleBuffer::filled(5, 5, 200).unwrap();
    let output = Blur::new().apply(&image).unwrap();
    assert!(output.as_slice().iter().all(|&v| v.abs_diff(200) <= 2));
}

#[test]
fn gradients_on_constant_field_are_zero() {
    for value in [0u8, 1, 77, 255] {
        let image = SampleBuffer::filled(5, 5, value).unwrap();
        for kind in [FilterKind::Sobel, FilterKind::Scharr] {
            let output = kind.build().apply(&image).unwrap();
            assert!(output.as_slice().iter().all(|&v| v == 0), "{kind} on {value}");
        }
    }
}

#[test]
fn combiner_threshold_suppresses_weak_gradients() {
    let mut gx = ResponseBuffer::new(7, 7).unwrap();
    let mut gy = ResponseBuffer::new(7, 7).unwrap();
    for i in 1..6 {
        for j in 1..6 {
            gx.set(i, j, 2).unwrap();
            gy.set(i, j, -2).unwrap();
        }
    }
    let output = combine(&gx, &gy, 50).unwrap();
    assert!(output.as_slice().iter().all(|&v| v == 0));
}

#[test]
fn box_sum_worked_example() {
    let ones: Kernel<i32> = Kernel::new([[1; 3]; 3]);
    let image = SampleBuffer::filled(5, 5, 1).unwrap();

    let raw = convolve(&image, &ones, 0);
    for i in 1..4 {
        for j in 1..4 {
            assert_eq!(raw.get(i, j).unwrap(), 9);
        }
    }
    assert_eq!(raw.get(0, 0).unwrap(), 0);
    assert_eq!(raw.get(4, 2).unwrap(), 0);

    let padded = unpad(&convolve(&pad(&image).unwrap(), &ones, 0)).unwrap();
    assert_eq!(padded.dim(), (5, 5));
    assert!(padded.as_slice().iter().all(|&v| v == 9));
}

#[test]
fn pipeline_equals_manual_composition() {
    for seed in 1..5 {
        let image = noise_image(20, 30, seed);
        let manual = Sobel::new()
            .apply(&Blur::new().apply(&image).unwrap())
            .unwrap();
        let piped = Pipeline::new()
            .append(Blur::new())
            .append(Sobel::new())
            .run(image)
            .unwrap();
        assert_eq!(piped, manual);
    }
}

#[test]
fn empty_pipeline_is_identity() {
    let image = noise_image(9, 4, 3);
    assert_eq!(Pipeline::new().run(image.clone()).unwrap(), image);
}

#[test]
fn pipeline_reports_failing_stage() {
    let err = Pipeline::new()
        .scharr()
        .run(SampleBuffer::new(6, 0).unwrap())
        .unwrap_err();

    match err {
        Error::Stage { index, filter, source } => {
            assert_eq!(index, 0);
            assert_eq!(filter, "scharr");
            assert_eq!(*source, Error::EmptyInput);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn filters_do_not_mutate_input() {
    let image = noise_image(12, 12, 99);
    let copy = image.clone();
    for filter in all_filters() {
        let _ = filter.apply(&image).unwrap();
    }
    assert_eq!(image, copy);
}
