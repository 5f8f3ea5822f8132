//! Minimal PDF writer for tests in this and dependent crates.
//!
//! Fonts: `/F1` Helvetica, `/F2` Helvetica-Bold, `/F3` a subset TrueType
//! `Calibri-Bold` with `/Widths [600 700]` for `A` and `B`.

const FONTS: &[&str] = &[
    "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    "<< /Type /Font /Subtype /TrueType /BaseFont /ABCDEF+Calibri-Bold /FirstChar 65 /LastChar 66 /Widths [600 700] >>",
];

/// Standard security handler, revision 2. The `/U` entry does not match the
/// empty user password.
const ENCRYPT: &str = "<< /Filter /Standard /V 1 /R 2 /Length 40 /P -4 \
    /O <0a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f9> \
    /U <f9e8d7c6b5a4938271605f4e3d2c1b0af9e8d7c6b5a4938271605f4e3d2c1b0a> >>";

const FILE_ID: &str = "<00112233445566778899aabbccddeeff>";

/// Build a PDF with one page per content stream and a correct xref table.
pub fn build_pdf(contents: &[&str]) -> Vec<u8> {
    write_pdf(contents, false)
}

/// Like [`build_pdf`], with an `/Encrypt` dictionary in the trailer.
pub fn build_encrypted_pdf(contents: &[&str]) -> Vec<u8> {
    write_pdf(contents, true)
}

fn write_pdf(contents: &[&str], encrypted: bool) -> Vec<u8> {
    let first_page = 3 + FONTS.len();
    let kids: Vec<String> = (0..contents.len())
        .map(|i| format!("{} 0 R", first_page + 2 * i))
        .collect();

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            contents.len()
        ),
    ];
    objects.extend(FONTS.iter().map(|f| f.to_string()));
    for (i, content) in contents.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> /Contents {} 0 R >>",
            first_page + 2 * i + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut trailer_extra = String::new();
    if encrypted {
        objects.push(ENCRYPT.to_string());
        trailer_extra = format!(" /Encrypt {} 0 R /ID [{FILE_ID} {FILE_ID}]", objects.len());
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }
    let xref_start = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R{} >>\nstartxref\n{}\n%%EOF",
        objects.len() + 1,
        trailer_extra,
        xref_start
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}
