// Simple color struct, created from an unsigned 32 representing RRGGBBAA

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = (num >> 0) as u8;

        Color { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Color {
        Color { a, ..self }
    }

    // CSS color string for the 2d canvas context, alpha mapped back to [0, 1]
    pub fn to_css_string(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_rrggbbaa_word() {
        let indigo = Color::from_u32(0x6366F1FF);
        assert_eq!((indigo.r, indigo.g, indigo.b, indigo.a), (99, 102, 241, 255));
    }

    #[test]
    fn css_string_scales_alpha() {
        let c = Color::from_u32(0xFFFFFF00).with_alpha(255);
        assert_eq!(c.to_css_string(), "rgba(255, 255, 255, 1.000)");
    }
}
