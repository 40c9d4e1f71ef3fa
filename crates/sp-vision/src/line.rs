use image::RgbaImage;
use sp_state::{Credit, TimelineEvent};

use crate::digit_reader::{DigitReader, TimerReading};
use crate::extract::extract_line;
use crate::recognizer::{RecognitionMiss, Recognizer};
use crate::LayoutConfig;

/// Recognize the features of one strip and build its event.
///
/// Returns `Ok(None)` for a blank strip. An elapsed-format timer leaves
/// `time` empty and records the reading as the event's elapsed time.
pub fn read_line(
    strip: RgbaImage,
    layout: &LayoutConfig,
    recognizer: &Recognizer,
) -> Result<Option<TimelineEvent>, RecognitionMiss> {
    let Some(features) = extract_line(strip, layout) else {
        return Ok(None);
    };

    let actor = recognizer.actor(&features.actor)?;
    let reading = DigitReader::new(layout, recognizer).read_timer(&features.timer)?;
    let text = recognizer.event_text(&features.text)?;
    let cast = features.portraits.try_map(|portrait| {
        Ok::<_, RecognitionMiss>(Credit {
            character: Some(recognizer.portrait(&portrait.interior)?),
            role: recognizer.role(portrait.border),
        })
    })?;
    let books = features.books.map(|color| recognizer.book(*color));

    let time = match reading {
        Some(TimerReading::Remaining(clock)) => Some(clock),
        _ => None,
    };
    let mut event = TimelineEvent::new(actor, time, text, cast, books);
    if let Some(TimerReading::Elapsed(clock)) = reading {
        event.annotate_elapsed(clock);
    }
    Ok(Some(event))
}
