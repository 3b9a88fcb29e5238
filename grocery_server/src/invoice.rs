//! PDF invoice rendering.
//!
//! A linear, single-page layout: letterhead, invoice number and date, bill-to block, a line-item
//! table, totals, and the payment footer. Amounts are printed as `Rs. 123.45` because the builtin
//! PDF fonts cannot encode the rupee glyph.

use gsb_common::Rupees;
use grocery_engine::{db_types::Order, order_objects::UserProfile};
use printpdf::{BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb};

use crate::errors::ServerError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;

/// Orders above this total ship free; below it, a flat fee is shown on the invoice.
const FREE_SHIPPING_THRESHOLD: Rupees = Rupees::from_paise(50_000);
const SHIPPING_FEE: Rupees = Rupees::from_paise(5_000);

pub fn render_invoice(order: &Order, owner: &UserProfile) -> Result<Vec<u8>, ServerError> {
    let (doc, page, layer) = PdfDocument::new(format!("Invoice #{}", order.id), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "invoice");
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    let mut cursor = Cursor { layer: &layer, y: MARGIN };

    // Letterhead
    cursor.text(&bold, 20.0, 70.0, "Grocery Shop");
    cursor.down(8.0);
    cursor.text(&font, 10.0, 62.0, "123 Main Street, City, Country");
    cursor.down(5.0);
    cursor.text(&font, 10.0, 52.0, "Phone: +1234567890 | Email: info@groceryshop.com");
    cursor.down(12.0);

    cursor.text(&bold, 14.0, 88.0, "INVOICE");
    cursor.down(7.0);
    cursor.text(&font, 10.0, 80.0, &format!("Invoice #: {}", order.id));
    cursor.down(5.0);
    cursor.text(&font, 10.0, 80.0, &format!("Date: {}", order.created_at.format("%d %b %Y")));
    cursor.down(10.0);

    // Bill-to block
    cursor.text(&bold, 11.0, MARGIN, "Bill To:");
    cursor.down(5.5);
    cursor.text(&font, 10.0, MARGIN, &owner.name);
    cursor.down(5.0);
    cursor.text(&font, 10.0, MARGIN, &format!("Email: {}", owner.email));
    cursor.down(5.0);
    let shipping = &order.shipping_address;
    cursor.text(
        &font,
        10.0,
        MARGIN,
        &format!("Shipping Address: {}, {}, {}", shipping.address, shipping.city, shipping.postal_code),
    );
    cursor.down(5.0);
    cursor.text(&font, 10.0, MARGIN, &format!("Phone: {}", shipping.phone));
    cursor.down(10.0);

    // Line items
    cursor.text(&bold, 10.0, MARGIN, "Item");
    cursor.text(&bold, 10.0, 110.0, "Quantity");
    cursor.text(&bold, 10.0, 140.0, "Unit Price");
    cursor.text(&bold, 10.0, 170.0, "Amount");
    cursor.down(3.0);
    cursor.rule(MARGIN, PAGE_WIDTH - MARGIN);
    cursor.down(6.0);
    for line in &order.lines {
        cursor.text(&font, 10.0, MARGIN, &line.title);
        cursor.text(&font, 10.0, 110.0, &line.quantity.to_string());
        cursor.text(&font, 10.0, 140.0, &rs(line.unit_price));
        cursor.text(&font, 10.0, 170.0, &rs(line.subtotal()));
        cursor.down(6.0);
    }
    cursor.rule(MARGIN, PAGE_WIDTH - MARGIN);
    cursor.down(7.0);

    // Totals
    let shipping_fee = if order.total > FREE_SHIPPING_THRESHOLD { Rupees::default() } else { SHIPPING_FEE };
    cursor.text(&font, 10.0, 140.0, "Subtotal:");
    cursor.text(&font, 10.0, 170.0, &rs(order.total));
    cursor.down(6.0);
    cursor.text(&font, 10.0, 140.0, "Shipping:");
    cursor.text(&font, 10.0, 170.0, &rs(shipping_fee));
    cursor.down(4.0);
    cursor.rule(140.0, PAGE_WIDTH - MARGIN);
    cursor.down(6.0);
    cursor.text(&bold, 12.0, 140.0, "Total:");
    cursor.text(&bold, 12.0, 170.0, &rs(order.total));
    cursor.down(14.0);

    // Payment footer
    cursor.text(&font, 10.0, MARGIN, &format!("Payment Method: {}", order.payment_method));
    cursor.down(5.0);
    cursor.text(&font, 10.0, MARGIN, &format!("Payment Status: {}", if order.is_paid { "Paid" } else { "Pending" }));
    if let Some(paid_at) = order.paid_at.filter(|_| order.is_paid) {
        cursor.down(5.0);
        cursor.text(&font, 10.0, MARGIN, &format!("Paid on: {}", paid_at.format("%d %b %Y")));
    }

    let footer_layer = &layer;
    footer_layer.use_text("Thank you for shopping with us!", 10.0, Mm(70.0), Mm(25.0), &font);
    footer_layer.use_text(
        "For questions regarding this invoice, please contact our customer support.",
        8.0,
        Mm(55.0),
        Mm(18.0),
        &font,
    );

    doc.save_to_bytes().map_err(|e| ServerError::DocumentError(e.to_string()))
}

fn rs(amount: Rupees) -> String {
    format!("Rs. {}", amount.to_decimal_string())
}

fn pdf_error(e: printpdf::Error) -> ServerError {
    ServerError::DocumentError(e.to_string())
}

/// Tracks a top-down y position on the page. `printpdf` measures from the bottom-left corner; the
/// layout reads more naturally top-down.
struct Cursor<'a> {
    layer: &'a PdfLayerReference,
    y: f32,
}

impl Cursor<'_> {
    fn text(&self, font: &IndirectFontRef, size: f32, x: f32, text: &str) {
        self.layer.use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - self.y), font);
    }

    fn down(&mut self, mm: f32) {
        self.y += mm;
    }

    fn rule(&self, x1: f32, x2: f32) {
        let y = Mm(PAGE_HEIGHT - self.y);
        self.layer.set_outline_color(Color::Rgb(Rgb::new(0.66, 0.66, 0.66, None)));
        self.layer.set_outline_thickness(0.5);
        let line = Line {
            points: vec![(Point::new(Mm(x1), y), false), (Point::new(Mm(x2), y), false)],
            is_closed: false,
        };
        self.layer.add_line(line);
    }
}
