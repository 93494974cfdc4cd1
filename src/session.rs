use std::fmt;
use std::time::Instant;
use crossbeam_channel::{Receiver, Sender};
use crate::common::TextMeasure;
use crate::data::{MeasureConfig, TimeCalc};
use crate::detectors::{DetectionAdapter, Detector};
use crate::display::{DisplaySink, UserInput};
use crate::frame_sources::FrameSource;
use crate::measure_engine::{EngineCommand, MeasureEngine};
use crate::rendering::FrameRenderer;
use crate::utils;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The source ran out of frames.
    SourceExhausted,
    /// The source failed to deliver a frame.
    SourceFailed(String),
    /// The user asked to quit.
    Quit,
    /// The configured frame limit was reached.
    FrameLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::SourceExhausted => write!(f, "frame source exhausted"),
            StopReason::SourceFailed(e) => write!(f, "frame source failed: {e}"),
            StopReason::Quit => write!(f, "quit requested"),
            StopReason::FrameLimit => write!(f, "frame limit reached"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: u64,
    pub resets: u64,
    pub stop_reason: StopReason,
}

/// The measuring loop: acquire, detect, annotate, render, show, poll. One frame at a time.
///
/// Calibration commands, whether from the display or from [`MeasureSession::command_sender`],
/// are applied between frames, never while a frame is being annotated.
pub struct MeasureSession<S, D, R, M> {
    source: S,
    adapter: DetectionAdapter<D>,
    engine: MeasureEngine<M>,
    renderer: FrameRenderer,
    display: R,
    config: MeasureConfig,
    commands_tx: Sender<EngineCommand>,
    commands_rx: Receiver<EngineCommand>,
    frames: u64,
    resets: u64,
    frame_time: TimeCalc,
}

impl<S, D, R, M> MeasureSession<S, D, R, M>
where
    S: FrameSource,
    D: Detector,
    R: DisplaySink,
    M: TextMeasure,
{
    pub fn new(source: S, detector: D, display: R, renderer: FrameRenderer, text: M, config: MeasureConfig) -> Self {
        let (commands_tx, commands_rx) = crossbeam_channel::unbounded();
        Self {
            source,
            adapter: DetectionAdapter::with_threshold(detector, config.confidence_threshold),
            engine: MeasureEngine::with_reference_width(text, config.reference_width_cm),
            renderer,
            display,
            config,
            commands_tx,
            commands_rx,
            frames: 0,
            resets: 0,
            frame_time: TimeCalc::default(),
        }
    }

    /// A handle other threads can use to queue commands for the next frame boundary.
    pub fn command_sender(&self) -> Sender<EngineCommand> {
        self.commands_tx.clone()
    }

    pub fn engine(&self) -> &MeasureEngine<M> {
        &self.engine
    }

    pub fn display(&self) -> &R {
        &self.display
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Wall time per processed frame, acquisition to show.
    pub fn frame_time(&self) -> &TimeCalc {
        &self.frame_time
    }

    /// Runs until the source ends, the user quits or the frame limit is hit.
    ///
    /// A source failure ends the loop without an error; detector and display failures are
    /// returned.
    pub fn run(&mut self) -> anyhow::Result<SessionSummary> {
        let stop_reason = loop {
            if let Some(reason) = self.step()? {
                break reason;
            }
        };

        log::info!(
            "Session stopped after {} frames ({}), avg frame time {:.2?}",
            self.frames,
            stop_reason,
            self.frame_time.avg()
        );
        Ok(SessionSummary {
            frames: self.frames,
            resets: self.resets,
            stop_reason,
        })
    }

    /// Processes a single frame. Returns the reason to stop, if the loop should stop.
    pub fn step(&mut self) -> anyhow::Result<Option<StopReason>> {
        if let Some(max_frames) = self.config.max_frames {
            if self.frames >= max_frames {
                return Ok(Some(StopReason::FrameLimit));
            }
        }

        self.apply_pending_commands();

        let frame_start = Instant::now();
        let mut frame = match self.source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!("No more frames");
                return Ok(Some(StopReason::SourceExhausted));
            }
            Err(e) => {
                log::error!("Failed to grab frame: {e:#}");
                return Ok(Some(StopReason::SourceFailed(format!("{e:#}"))));
            }
        };
        let mut elapsed = utils::trace("FRAME", "Acquire", frame_start, std::time::Duration::ZERO);

        if self.config.mirror {
            frame.mirror_horizontal();
        }

        let boxes = self.adapter.detect(&frame)?;
        let instructions = self.engine.annotate(&boxes);
        elapsed = utils::trace("FRAME", "Detect+annotate", frame_start, elapsed);

        let annotated = self.renderer.render(&frame.image, &instructions);
        self.display.show(frame.frame_index, &annotated, &instructions)?;
        utils::trace("FRAME", "Render+show", frame_start, elapsed);

        self.frame_time.push(frame_start.elapsed());
        self.frames += 1;

        let mut quit = false;
        for input in self.display.poll_input()? {
            match input {
                UserInput::ResetCalibration => {
                    // receiver lives in self, so the channel is never disconnected here
                    let _ = self.commands_tx.send(EngineCommand::ResetCalibration);
                }
                UserInput::Quit => quit = true,
            }
        }

        if quit {
            return Ok(Some(StopReason::Quit));
        }
        Ok(None)
    }

    fn apply_pending_commands(&mut self) {
        for command in self.commands_rx.try_iter() {
            self.engine.apply(command);
            if command == EngineCommand::ResetCalibration {
                self.resets += 1;
            }
        }
    }
}
