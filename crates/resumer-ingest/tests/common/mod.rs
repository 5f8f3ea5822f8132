//! Shared fixtures. `/F1` is Helvetica and `/F2` Helvetica-Bold.

pub use resumer_pdf_lopdf::testing::build_pdf;

pub const SIMPLE_RESUME: &str = "BT /F2 16 Tf 72 740 Td (Jane Doe) Tj ET \
    BT /F1 10 Tf 72 720 Td (jane@example.com) Tj ET \
    BT /F2 12 Tf 72 690 Td (EDUCATION) Tj ET \
    BT /F1 10 Tf 14 TL 72 670 Td (State University) Tj T* (B.S. Computer Science) Tj T* \
    (2015 - 2019) Tj ET";
