use crate::access::domain::verdict::AccessState;
use crate::shared::color::Rgb;

/// How the status panel looks for one access state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusAppearance {
    pub label: &'static str,
    pub panel: Rgb,
    pub text: Rgb,
}

impl StatusAppearance {
    pub fn for_state(state: AccessState) -> Self {
        match state {
            AccessState::Unlocked => Self {
                label: "UNLOCKED",
                panel: Rgb::GREEN,
                text: Rgb::BLACK,
            },
            AccessState::Denied => Self {
                label: "ACCESS DENIED",
                panel: Rgb::RED,
                text: Rgb::WHITE,
            },
            AccessState::Locked => Self {
                label: "LOCKED",
                panel: Rgb::RED,
                text: Rgb::WHITE,
            },
        }
    }
}

/// Box and label-band color on the camera view.
pub fn region_color(is_match: bool) -> Rgb {
    if is_match {
        Rgb::GREEN
    } else {
        Rgb::RED
    }
}
