/// An RGB drawing color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn to_array(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}
