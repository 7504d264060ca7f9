use image::{Rgba, RgbaImage};

use qrtile::{
    BytesContent, Content, Ecl, Encoder, EncodingError, QrCode, SecurityType, StringContent,
    SymbolError, Version, WifiContent,
};

const FOREGROUND: Rgba<u8> = Rgba([51, 51, 51, 255]);
const BACKGROUND: Rgba<u8> = Rgba([254, 254, 254, 255]);

/// Scan `image` with a QR decoder and return the payloads of every code found.
fn scan(image: &RgbaImage) -> Vec<String> {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        image.width() as usize,
        image.height() as usize,
        |x, y| {
            let Rgba([r, g, b, _]) = *image.get_pixel(x as u32, y as u32);
            ((r as u16 + g as u16 + b as u16) / 3) as u8
        },
    );
    prepared
        .detect_grids()
        .into_iter()
        .map(|grid| grid.decode().unwrap().1)
        .collect()
}

/// Encode `payload` with the `qrcode` crate directly and add a 4 module quiet zone.
fn reference_rows(payload: &str, ecl: qrcode::EcLevel) -> Vec<Vec<bool>> {
    let symbol = qrcode::QrCode::with_error_correction_level(payload, ecl).unwrap();
    let size = symbol.width() + 8;
    (0..size)
        .map(|y| {
            (0..size)
                .map(|x| {
                    (4..size - 4).contains(&x)
                        && (4..size - 4).contains(&y)
                        && symbol[(x - 4, y - 4)] == qrcode::Color::Dark
                })
                .collect()
        })
        .collect()
}

fn build<C: Content + 'static>(content: C) -> QrCode {
    Encoder::new()
        .with_content(content)
        .with_ecl(Ecl::L)
        .with_foreground(FOREGROUND)
        .with_background(BACKGROUND)
        .build()
        .unwrap()
}

#[test]
fn string_content_matches_direct_encoding() {
    let code = build(StringContent::new("Hello, world!"));
    assert_eq!(code.to_bool_array(), reference_rows("Hello, world!", qrcode::EcLevel::L));
}

#[test]
fn bytes_content_is_encoded_as_base64() {
    let code = build(BytesContent::new(b"Hello, world!".to_vec()));
    assert_eq!(
        code.to_bool_array(),
        reference_rows("SGVsbG8sIHdvcmxkIQ==", qrcode::EcLevel::L)
    );
}

#[test]
fn wifi_content_matches_direct_encoding() {
    let code = build(WifiContent::new("TP-Link", "12345", SecurityType::Wpa, true));
    assert_eq!(
        code.to_bool_array(),
        reference_rows("WIFI:T:WPA;S:TP-Link;P:12345;H:true;", qrcode::EcLevel::L)
    );

    let code = build(WifiContent::no_password("TP-Link", true));
    assert_eq!(
        code.to_bool_array(),
        reference_rows("WIFI:T:nopass;S:TP-Link;P:;H:true;", qrcode::EcLevel::L)
    );
}

#[test]
fn dimensions_are_consistent() {
    let code = build(StringContent::new("dimensions"));
    let rows = code.to_bool_array();
    assert_eq!(rows.len(), code.height());
    assert_eq!(rows[0].len(), code.width());
    assert_eq!(code.width(), code.matrix().width());
}

#[test]
fn resized_image_follows_the_modules() {
    let code = build(StringContent::new("https://example.com"));
    let scale = 3;
    let (width, height) = (code.width() as u32 * scale, code.height() as u32 * scale);
    let image = code.to_resized_image(width, height);
    assert_eq!(image.dimensions(), (width, height));
    for (y, row) in code.to_bool_array().iter().enumerate() {
        for (x, &dark) in row.iter().enumerate() {
            let expected = if dark { FOREGROUND } else { BACKGROUND };
            let (px, py) = (x as u32 * scale + 1, y as u32 * scale + 1);
            assert_eq!(*image.get_pixel(px, py), expected, "module ({x}, {y})");
        }
    }
}

#[test]
fn small_string_of_odd_height() {
    let code = build(StringContent::new("HELLO"));
    // Version 1 with a quiet zone: 29 rows.
    assert_eq!(code.height(), 29);
    let rendered = code.to_small_string();
    assert_eq!(rendered.lines().count(), 15);
    // The last line only holds the quiet zone's bottom row over nothing.
    let last = rendered.lines().last().unwrap();
    assert!(!last.contains('▀') && !last.contains('▄') && !last.contains('█'));
    assert_eq!(rendered, code.to_small_string());
}

#[test]
fn decorated_image_keeps_finder_patterns() {
    let code = build(StringContent::new("decorated"));
    let transparent = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
    let image = code.to_image_with_block(&transparent);
    let margin = code.margin();
    let inner = code.width() - 2 * margin;
    for (cx, cy) in [(0, 0), (inner - 7, 0), (0, inner - 7)] {
        for k in 0..7 {
            for (x, y) in [(cx + k, cy), (cx, cy + k), (cx + 6, cy + k), (cx + k, cy + 6)] {
                let (px, py) = (((x + margin) * 4 + 2) as u32, ((y + margin) * 4 + 2) as u32);
                assert_eq!(*image.get_pixel(px, py), code.foreground());
            }
        }
    }
    // The quiet zone is background whatever the block.
    assert_eq!(*image.get_pixel(0, 0), code.background());
}

#[test]
fn inverted_build_swaps_colors_once() {
    let code = Encoder::new()
        .with_content(StringContent::new("invert"))
        .with_foreground(FOREGROUND)
        .with_background(BACKGROUND)
        .inverted(true)
        .build()
        .unwrap();
    assert_eq!(code.foreground(), BACKGROUND);
    assert_eq!(code.background(), FOREGROUND);
    let image = code.to_image();
    // Quiet zone modules are light, drawn in the swapped background.
    assert_eq!(*image.get_pixel(0, 0), FOREGROUND);
}

#[test]
fn border_can_be_disabled() {
    let code = Encoder::new()
        .with_content(StringContent::new("HELLO"))
        .with_ecl(Ecl::L)
        .with_margin(10)
        .without_border()
        .build()
        .unwrap();
    assert_eq!(code.width(), Version::V01.symbol_size());
    assert_eq!(code.margin(), 0);
    // The finder pattern now starts at the very corner.
    assert!(code.to_bool_array()[0][0]);
}

#[test]
fn forced_version_is_honoured_or_rejected() {
    let code = Encoder::new()
        .with_content(StringContent::new("HELLO"))
        .with_version(Version::V03)
        .without_border()
        .build()
        .unwrap();
    assert_eq!(code.width(), Version::V03.symbol_size());

    let err = Encoder::new()
        .with_content(BytesContent::new(vec![0u8; 200]))
        .with_version(Version::V02)
        .build()
        .unwrap_err();
    assert!(matches!(err, EncodingError::Symbol(SymbolError::DataTooLong { .. })));
}

/// Render `content` at eight pixels per module and scan it back.
fn scan_resized<C: Content + 'static>(content: C, ecl: Ecl) -> Vec<String> {
    let code = Encoder::new().with_content(content).with_ecl(ecl).build().unwrap();
    let scale = 8;
    scan(&code.to_resized_image(code.width() as u32 * scale, code.height() as u32 * scale))
}

#[test]
fn resized_image_scans_back_for_every_ecl() {
    for ecl in [Ecl::L, Ecl::M, Ecl::Q, Ecl::H] {
        assert_eq!(
            scan_resized(StringContent::new("https://example.com/qrtile"), ecl),
            vec!["https://example.com/qrtile"],
            "ECL {ecl}"
        );
        assert_eq!(
            scan_resized(BytesContent::new(b"\x00\x01binary\xff".to_vec()), ecl),
            vec!["AAFiaW5hcnn/"],
            "ECL {ecl}"
        );
        assert_eq!(
            scan_resized(WifiContent::new("TP-Link", "pa;ss", SecurityType::Wpa, true), ecl),
            vec!["WIFI:T:WPA;S:TP-Link;P:pa\\;ss;H:true;"],
            "ECL {ecl}"
        );
    }
}

#[test]
fn decorated_image_scans_back() {
    let url = "https://example.com/decorated";
    let code = Encoder::new()
        .with_content(StringContent::new(url))
        .with_ecl(Ecl::H)
        .with_foreground(FOREGROUND)
        .with_background(BACKGROUND)
        .build()
        .unwrap();
    // A dot inset by one pixel: mostly opaque, transparent around the edges.
    let block = RgbaImage::from_fn(8, 8, |x, y| {
        if (1..7).contains(&x) && (1..7).contains(&y) {
            FOREGROUND
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let image = code.to_image_with_block(&block);
    assert_eq!(scan(&image), vec![url.to_owned()]);
}
