use crate::camera::domain::frame_source::FrameSource;
use crate::shared::frame::{Frame, PixelOrder, CHANNELS};

/// Captures from a local camera through libavdevice.
///
/// The device is opened with the platform's capture format (`v4l2`,
/// `avfoundation` or `dshow`). Decoded frames are scaled to the configured
/// resolution and converted to packed BGR24, the layout cameras usually
/// hand out natively.
pub struct FfmpegCameraSource {
    device: String,
    width: u32,
    height: u32,
    input_ctx: Option<ffmpeg_next::format::context::Input>,
    decoder: Option<ffmpeg_next::decoder::Video>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    video_stream_index: usize,
    frame_index: usize,
}

// Safety: FfmpegCameraSource is only used from the loop thread.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegCameraSource {}

/// Capture format name libavdevice registers on this platform.
pub fn platform_format() -> &'static str {
    if cfg!(target_os = "macos") {
        "avfoundation"
    } else if cfg!(target_os = "windows") {
        "dshow"
    } else {
        "v4l2"
    }
}

/// Device used when none is given on the command line.
pub fn default_device() -> &'static str {
    if cfg!(target_os = "macos") {
        "0"
    } else if cfg!(target_os = "windows") {
        "video=Integrated Camera"
    } else {
        "/dev/video0"
    }
}

impl FfmpegCameraSource {
    pub fn new(device: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            device: device.into(),
            width,
            height,
            input_ctx: None,
            decoder: None,
            scaler: None,
            video_stream_index: 0,
            frame_index: 0,
        }
    }

    fn find_input_format() -> Result<ffmpeg_next::format::Input, Box<dyn std::error::Error>> {
        let wanted = platform_format();
        ffmpeg_next::device::input::video()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| format!("Capture format {wanted} is not available").into())
    }
}

impl FrameSource for FfmpegCameraSource {
    fn start(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        ffmpeg_next::device::register_all();

        let format = Self::find_input_format()?;
        let mut options = ffmpeg_next::Dictionary::new();
        options.set("video_size", &format!("{}x{}", self.width, self.height));

        let ictx = ffmpeg_next::format::open_with(
            &self.device,
            &ffmpeg_next::format::Format::Input(format),
            options,
        )
        .map_err(|e| format!("Failed to open camera {}: {e}", self.device))?
        .input();

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("Camera exposes no video stream")?;
        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg_next::format::Pixel::BGR24,
            self.width,
            self.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::debug!(
            "Camera {} delivers {}x{}, scaling to {}x{}",
            self.device,
            decoder.width(),
            decoder.height(),
            self.width,
            self.height
        );

        self.video_stream_index = video_stream_index;
        self.input_ctx = Some(ictx);
        self.decoder = Some(decoder);
        self.scaler = Some(scaler);
        self.frame_index = 0;
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let (Some(ictx), Some(decoder), Some(scaler)) = (
            self.input_ctx.as_mut(),
            self.decoder.as_mut(),
            self.scaler.as_mut(),
        ) else {
            return Err("FfmpegCameraSource: not started".into());
        };

        loop {
            let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
            if decoder.receive_frame(&mut decoded).is_ok() {
                let mut bgr = ffmpeg_next::util::frame::video::Video::empty();
                scaler.run(&decoded, &mut bgr)?;
                let pixels = extract_packed_pixels(&bgr, self.width, self.height);
                let frame = Frame::new(pixels, self.width, self.height, PixelOrder::Bgr, self.frame_index);
                self.frame_index += 1;
                return Ok(frame);
            }

            let Some((stream, packet)) = ictx.packets().next() else {
                return Err("Camera stream ended".into());
            };
            if stream.index() != self.video_stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
        }
    }

    fn stop(&mut self) {
        self.scaler = None;
        self.decoder = None;
        self.input_ctx = None;
    }
}

/// Copies a scaled frame into a tightly packed buffer, dropping row padding.
fn extract_packed_pixels(
    frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = frame.stride(0);
    let data = frame.data(0);
    let row_len = width as usize * CHANNELS;

    let mut pixels = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_len]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_before_start_fails() {
        let mut source = FfmpegCameraSource::new(default_device(), 640, 480);
        assert!(source.capture_frame().is_err());
    }

    #[test]
    fn test_start_unknown_device_fails() {
        let mut source = FfmpegCameraSource::new("/nonexistent/video99", 640, 480);
        assert!(source.start().is_err());
    }

    #[test]
    fn test_stop_idempotent() {
        let mut source = FfmpegCameraSource::new(default_device(), 640, 480);
        source.stop();
        source.stop();
        assert!(source.capture_frame().is_err());
    }

    #[test]
    fn test_extract_strips_row_padding() {
        ffmpeg_next::init().unwrap();
        let mut frame =
            ffmpeg_next::util::frame::video::Video::new(ffmpeg_next::format::Pixel::BGR24, 3, 2);
        let stride = frame.stride(0);
        let data = frame.data_mut(0);
        for row in 0..2 {
            for b in 0..9 {
                data[row * stride + b] = (row * 10 + b) as u8;
            }
        }

        let pixels = extract_packed_pixels(&frame, 3, 2);
        assert_eq!(pixels.len(), 18);
        assert_eq!(pixels[0], 0);
        assert_eq!(pixels[8], 8);
        assert_eq!(pixels[9], 10);
        assert_eq!(pixels[17], 18);
    }
}
