use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn check_email_page(email: &str) -> Markup {
    desktop_layout(
        "Check your email",
        None,
        html! {
            main class="container narrow" {
                h1 { "Check your email" }
                p {
                    "We sent a sign-in link to "
                    strong { (email) }
                    ". It expires in 15 minutes and works once."
                }
                p { a href="/login" { "Try with a different email" } }
            }
        },
    )
}
