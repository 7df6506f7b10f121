use super::*;
use crate::codec::memory::{InMemorySink, InMemorySource};

const RED: Argb = Argb::opaque(255, 0, 0);
const BLUE: Argb = Argb::opaque(0, 0, 255);
const SLOT: Argb = Argb::opaque(0, 0, 0);

fn red_and_slot() -> Palette {
    Palette::new(vec![RED, SLOT])
}

fn screen(width: u32, height: u32) -> ScreenInfo {
    ScreenInfo {
        width,
        height,
        background: None,
    }
}

fn record(
    rect: FrameRect,
    disposal: DisposalMode,
    fill: u8,
    transparent: Option<u8>,
) -> FrameRecord {
    FrameRecord {
        rect,
        disposal,
        transparent,
        delay: 7,
        raster: vec![fill; rect.area().unwrap()],
        palette: Some(red_and_slot()),
        local_palette: false,
    }
}

fn sprite_over_red(first_disposal: DisposalMode) -> InMemorySource {
    let frames = vec![
        record(FrameRect::new(0, 0, 4, 4), first_disposal, 0, Some(1)),
        record(FrameRect::new(1, 1, 2, 2), DisposalMode::DoNotDispose, 1, Some(1)),
    ];
    InMemorySource::new(screen(4, 4), Some(red_and_slot()), frames)
}

#[test]
fn transparent_sprite_keeps_red_frame_visible() {
    let mut source = sprite_over_red(DisposalMode::Unspecified);
    let mut sink = InMemorySink::new();
    let stats = transcode_frames(&mut source, &mut sink, &TranscodeOpts::default()).unwrap();

    assert_eq!(stats.frames, 2);
    assert_eq!((stats.output_width, stats.output_height), (2, 2));
    assert!(sink.is_finished());

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (2, 2));
    assert_eq!(cfg.global_palette, Some(red_and_slot()));

    assert_eq!(sink.frames().len(), 2);
    for out in sink.frames() {
        assert_eq!(out.rect, FrameRect::new(0, 0, 2, 2));
        assert_eq!(out.disposal, DisposalMode::RestoreBackground);
        assert_eq!(out.raster, vec![0; 4]);
        assert_eq!(out.transparent, Some(1));
        assert_eq!(out.palette, None);
    }
}

#[test]
fn do_not_dispose_leaves_canvas_untouched_under_transparency() {
    let mut source = sprite_over_red(DisposalMode::DoNotDispose);
    let canvas = render_canvas_frame(&mut source, 1, &TranscodeOpts::default()).unwrap();
    assert!(canvas.pixels().iter().all(|&p| p == RED));
}

#[test]
fn unspecified_disposal_lets_transparency_through() {
    let mut source = sprite_over_red(DisposalMode::Unspecified);
    let canvas = render_canvas_frame(&mut source, 1, &TranscodeOpts::default()).unwrap();
    assert_eq!(canvas.get_pixel(0, 0), RED);
    assert_eq!(canvas.get_pixel(1, 1), Argb::TRANSPARENT);
    assert_eq!(canvas.get_pixel(2, 2), Argb::TRANSPARENT);
    assert_eq!(canvas.get_pixel(3, 3), RED);
}

#[test]
fn render_canvas_frame_rejects_index_past_end() {
    let mut source = sprite_over_red(DisposalMode::Unspecified);
    let err = render_canvas_frame(&mut source, 2, &TranscodeOpts::default()).unwrap_err();
    assert!(matches!(err, HalfGifError::Validation(_)));
}

#[test]
fn fully_transparent_block_quantizes_to_transparent_index() {
    let frames = vec![record(
        FrameRect::new(0, 0, 4, 2),
        DisposalMode::Unspecified,
        1,
        Some(1),
    )];
    let mut source = InMemorySource::new(screen(4, 2), Some(red_and_slot()), frames);
    let mut sink = InMemorySink::new();
    transcode_frames(&mut source, &mut sink, &TranscodeOpts::default()).unwrap();

    assert_eq!(sink.frames()[0].raster, vec![1, 1]);
}

#[test]
fn missing_palette_is_corrupt() {
    let mut frame = record(FrameRect::new(0, 0, 2, 2), DisposalMode::Unspecified, 0, None);
    frame.palette = None;
    let mut source = InMemorySource::new(screen(2, 2), None, vec![frame]);
    let mut sink = InMemorySink::new();

    let err = transcode_frames(&mut source, &mut sink, &TranscodeOpts::default()).unwrap_err();
    assert!(matches!(err, HalfGifError::Corrupt { frame: 0, .. }));
    assert!(!sink.is_finished());
}

#[test]
fn out_of_range_index_aborts_at_that_frame() {
    let good = record(FrameRect::new(0, 0, 2, 2), DisposalMode::Unspecified, 0, None);
    // one past the last palette entry
    let bad = record(FrameRect::new(0, 0, 2, 2), DisposalMode::Unspecified, 2, None);
    let mut source = InMemorySource::new(screen(2, 2), Some(red_and_slot()), vec![good, bad]);
    let mut sink = InMemorySink::new();

    let err = transcode_frames(&mut source, &mut sink, &TranscodeOpts::default()).unwrap_err();
    assert!(matches!(err, HalfGifError::Corrupt { frame: 1, .. }));
    assert_eq!(sink.frames().len(), 1);
    assert!(!sink.is_finished());
}

#[test]
fn oversized_screen_is_resource_error() {
    let opts = TranscodeOpts {
        max_canvas_pixels: 15,
        ..TranscodeOpts::default()
    };
    let mut source = InMemorySource::new(screen(4, 4), Some(red_and_slot()), Vec::new());
    let mut sink = InMemorySink::new();

    let err = transcode_frames(&mut source, &mut sink, &opts).unwrap_err();
    assert!(matches!(err, HalfGifError::Resource(_)));
    assert!(sink.config().is_none());
}

#[test]
fn zero_frames_still_produce_a_container() {
    let mut source = InMemorySource::new(screen(5, 3), Some(red_and_slot()), Vec::new());
    let mut sink = InMemorySink::new();
    let stats = transcode_frames(&mut source, &mut sink, &TranscodeOpts::default()).unwrap();

    assert_eq!(stats.frames, 0);
    assert_eq!((stats.output_width, stats.output_height), (3, 2));
    assert!(sink.is_finished());
    assert!(sink.frames().is_empty());
}

#[test]
fn local_or_foreign_palettes_are_attached() {
    let mut local = record(FrameRect::new(0, 0, 2, 2), DisposalMode::Unspecified, 0, None);
    local.local_palette = true;

    let mut foreign = record(FrameRect::new(0, 0, 2, 2), DisposalMode::Unspecified, 0, None);
    foreign.palette = Some(Palette::new(vec![BLUE, RED]));

    let shared = record(FrameRect::new(0, 0, 2, 2), DisposalMode::Unspecified, 0, None);

    let mut source = InMemorySource::new(
        screen(2, 2),
        Some(red_and_slot()),
        vec![local, foreign, shared],
    );
    let mut sink = InMemorySink::new();
    transcode_frames(&mut source, &mut sink, &TranscodeOpts::default()).unwrap();

    let frames = sink.frames();
    assert_eq!(frames[0].palette, Some(red_and_slot()));
    assert_eq!(frames[1].palette, Some(Palette::new(vec![BLUE, RED])));
    assert_eq!(frames[1].raster, vec![0]);
    assert_eq!(frames[2].palette, None);
}

#[test]
fn delays_follow_keep_delays() {
    let run = |keep_delays| {
        let mut source = sprite_over_red(DisposalMode::Unspecified);
        let mut sink = InMemorySink::new();
        let opts = TranscodeOpts {
            keep_delays,
            ..TranscodeOpts::default()
        };
        transcode_frames(&mut source, &mut sink, &opts).unwrap();
        sink.frames().iter().map(|f| f.delay).collect::<Vec<_>>()
    };

    assert_eq!(run(true), vec![7, 7]);
    assert_eq!(run(false), vec![0, 0]);
}

#[test]
fn loop_count_reaches_the_sink() {
    let mut source = sprite_over_red(DisposalMode::Unspecified);
    let mut sink = InMemorySink::new();
    let opts = TranscodeOpts {
        loop_count: Some(3),
        ..TranscodeOpts::default()
    };
    transcode_frames(&mut source, &mut sink, &opts).unwrap();
    assert_eq!(sink.config().unwrap().loop_count, Some(3));
}

#[test]
fn parallel_output_matches_sequential() {
    let palette = Palette::new(vec![
        RED,
        BLUE,
        Argb::opaque(0, 255, 0),
        Argb::opaque(255, 255, 255),
        SLOT,
    ]);
    let raster: Vec<u8> = (0..(9 * 7)).map(|i| (i * 7 % 5) as u8).collect();
    let frame = FrameRecord {
        rect: FrameRect::new(0, 0, 9, 7),
        disposal: DisposalMode::DoNotDispose,
        transparent: Some(4),
        delay: 0,
        raster,
        palette: Some(palette.clone()),
        local_palette: false,
    };
    let sprite = FrameRecord {
        rect: FrameRect::new(2, 3, 3, 2),
        raster: vec![4, 1, 2, 3, 4, 0],
        ..frame.clone()
    };

    let run = |opts: TranscodeOpts| {
        let mut source = InMemorySource::new(
            screen(9, 7),
            Some(palette.clone()),
            vec![frame.clone(), sprite.clone()],
        );
        let mut sink = InMemorySink::new();
        transcode_frames(&mut source, &mut sink, &opts).unwrap();
        sink.frames().to_vec()
    };

    let sequential = run(TranscodeOpts::default());
    let parallel = run(TranscodeOpts {
        parallel: true,
        threads: Some(3),
        ..TranscodeOpts::default()
    });
    assert_eq!(sequential, parallel);
    assert_eq!(sequential[0].raster.len(), 5 * 4);
}

#[test]
fn screen_background_fills_first_frame() {
    let mut screen = screen(4, 4);
    screen.background = Some(BLUE);
    let frame = record(FrameRect::new(0, 0, 2, 2), DisposalMode::Unspecified, 0, None);

    let canvas = render_canvas_frame(
        &mut InMemorySource::new(screen, Some(red_and_slot()), vec![frame.clone()]),
        0,
        &TranscodeOpts::default(),
    )
    .unwrap();
    assert_eq!(canvas.get_pixel(3, 3), BLUE);

    let opts = TranscodeOpts {
        background: BackgroundMode::Transparent,
        ..TranscodeOpts::default()
    };
    let canvas = render_canvas_frame(
        &mut InMemorySource::new(screen, Some(red_and_slot()), vec![frame]),
        0,
        &opts,
    )
    .unwrap();
    assert_eq!(canvas.get_pixel(3, 3), Argb::TRANSPARENT);
}

#[test]
fn invalid_opts_fail_before_touching_the_sink() {
    let opts = TranscodeOpts {
        threads: Some(2),
        ..TranscodeOpts::default()
    };
    let mut source = sprite_over_red(DisposalMode::Unspecified);
    let mut sink = InMemorySink::new();

    let err = transcode_frames(&mut source, &mut sink, &opts).unwrap_err();
    assert!(matches!(err, HalfGifError::Validation(_)));
    assert!(sink.config().is_none());
    // the source is closed on the error path too
    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn same_path_is_rejected() {
    let path = std::path::Path::new("target/pipeline_unit/same.gif");
    let err = transcode(path, path, &TranscodeOpts::default()).unwrap_err();
    assert!(matches!(err, HalfGifError::Validation(_)));
}
