use finger_picker::PickerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("could not open window: {0}")]
    Window(#[from] minifb::Error),

    #[error(transparent)]
    Picker(#[from] PickerError),
}
