use crate::domain::model::Order;
use crate::domain::ports::{NotificationReceipt, Notifier};
use crate::utils::codec::serialize_pretty;
use crate::utils::error::Result;
use tera::{Context, Tera};

const HTML_TEMPLATE: &str = "order_received.html";
const TEXT_TEMPLATE: &str = "order_received.txt";

// `.html` templates are autoescaped by tera, `.txt` ones are not
fn templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (HTML_TEMPLATE, include_str!("../../views/order_received.html")),
        (TEXT_TEMPLATE, include_str!("../../views/order_received.txt")),
    ])?;
    Ok(tera)
}

fn render(template: &str, email: &str, message: &str) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("email", email);
    ctx.insert("message", message);
    Ok(templates()?.render(template, &ctx)?)
}

pub fn html_content(email: &str, message: &str) -> Result<String> {
    render(HTML_TEMPLATE, email, message)
}

pub fn text_content(email: &str, message: &str) -> Result<String> {
    render(TEXT_TEMPLATE, email, message)
}

/// 將定價後的訂單寄到 billing email
pub async fn send_order_confirmation<N: Notifier + ?Sized>(
    notifier: &N,
    recipient: &str,
    order: &Order,
) -> Result<NotificationReceipt> {
    let message = serialize_pretty(order)?;
    notifier.notify(recipient, &message).await
}
