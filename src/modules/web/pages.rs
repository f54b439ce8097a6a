//! maud templates for the librarian's pages.

use axum::http::StatusCode;
use maud::{html, Markup, DOCTYPE};
use time::{macros::format_description, OffsetDateTime};

use crate::modules::{
    catalog::models::Book, ledger::models::Transaction, lending::models::ReturnSummary,
    members::models::Member,
};

const STYLE: &str = "
body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; color: #222; }
nav a { margin-right: 1rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border-bottom: 1px solid #ddd; padding: .4rem; text-align: left; }
form.inline { display: inline; }
label { display: block; margin: .5rem 0; }
.error { color: #a00; }
.muted { color: #777; }
";

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) " | Libris" }
                style { (STYLE) }
            }
            body {
                nav {
                    a href="/" { "Catalog" }
                    a href="/books/new" { "Add book" }
                    a href="/members" { "Members" }
                    a href="/returns" { "Return a book" }
                    a href="/transactions" { "Transactions" }
                }
                h1 { (title) }
                (content)
            }
        }
    }
}

fn timestamp(at: OffsetDateTime) -> String {
    at.format(format_description!("[year]-[month]-[day] [hour]:[minute] UTC"))
        .unwrap_or_default()
}

pub fn catalog(books: &[Book]) -> Markup {
    layout(
        "Catalog",
        html! {
            @if books.is_empty() {
                p.muted { "No books yet. " a href="/books/new" { "Add one." } }
            } @else {
                table {
                    thead { tr {
                        th { "ID" } th { "Title" } th { "Author" } th { "Publisher" }
                        th { "ISBN" } th { "Issued" } th { "Status" }
                    } }
                    tbody {
                        @for book in books {
                            tr {
                                td { (book.book_id) }
                                td { (book.title) }
                                td { (book.author) }
                                td { (book.publisher) }
                                td { (book.isbn.as_deref().unwrap_or("")) }
                                td { (book.times_issued) }
                                td {
                                    @if book.is_available() {
                                        a href={ "/checkout/" (book.book_id) } { "Check out" }
                                    } @else {
                                        span.muted { "Checked out" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn new_book() -> Markup {
    layout(
        "Add a book",
        html! {
            form method="post" action="/books/new" {
                label { "Book ID " input name="book_id" inputmode="numeric" required; }
                label { "Title " input name="title"; }
                label { "Author " input name="author"; }
                label { "Publisher " input name="publisher"; }
                label { "ISBN " input name="isbn"; }
                button type="submit" { "Add book" }
            }
        },
    )
}

pub fn members(members: &[Member], opening_balance: i64) -> Markup {
    layout(
        "Members",
        html! {
            table {
                thead { tr {
                    th { "ID" } th { "Name" } th { "Balance" } th { "Fees paid" }
                    th { "Borrowing" } th {}
                } }
                tbody {
                    @for member in members {
                        tr {
                            td { (member.member_id) }
                            td { (member.name) }
                            td { (member.balance) }
                            td { (member.fees_paid) }
                            td { @if member.is_borrowing { "Yes" } @else { "No" } }
                            td {
                                a href={ "/members/" (member.member_id) "/balance" } { "Adjust balance" }
                                " "
                                form.inline method="post" action={ "/members/" (member.member_id) "/delete" } {
                                    button type="submit" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
            h2 { "Register a member" }
            form method="post" action="/members" {
                label { "Name " input name="name" required; }
                label { "Balance " input name="balance" inputmode="numeric" placeholder=(opening_balance); }
                button type="submit" { "Register" }
            }
        },
    )
}

pub fn balance_form(member: &Member) -> Markup {
    layout(
        "Adjust balance",
        html! {
            p { (member.name) "'s balance is " strong { (member.balance) } "." }
            form method="post" action={ "/members/" (member.member_id) "/balance" } {
                label { "Amount (e.g. 200 or -50) " input name="amount" required; }
                button type="submit" { "Apply" }
            }
        },
    )
}

pub fn transactions(transactions: &[Transaction]) -> Markup {
    layout(
        "Transactions",
        html! {
            table {
                thead { tr {
                    th { "#" } th { "When" } th { "Book" } th { "Member" } th { "Type" }
                } }
                tbody {
                    @for entry in transactions {
                        tr {
                            td { (entry.id) }
                            td { (timestamp(entry.occurred_at)) }
                            td { (entry.book_title) " (" (entry.book_id) ")" }
                            td { (entry.member_name) " (" (entry.member_id) ")" }
                            td { (entry.direction.label()) }
                        }
                    }
                }
            }
        },
    )
}

pub fn checkout_form(book: &Book, eligible: &[Member], deposit: i64) -> Markup {
    layout(
        "Check out",
        html! {
            p { "Lending " strong { (book.title) } " by " (book.author) ". A deposit of " (deposit) " is held." }
            @if eligible.is_empty() {
                p.muted { "No member is free to borrow right now." }
            } @else {
                form method="post" action={ "/checkout/" (book.book_id) } {
                    label {
                        "Member "
                        select name="member_id" {
                            @for member in eligible {
                                option value=(member.member_id) {
                                    (member.name) " (balance " (member.balance) ")"
                                }
                            }
                        }
                    }
                    button type="submit" { "Check out" }
                }
            }
        },
    )
}

pub fn returns(books: &[Book]) -> Markup {
    layout(
        "Return a book",
        html! {
            @if books.is_empty() {
                p.muted { "Nothing is checked out." }
            }
            @for book in books {
                form method="post" action={ "/returns/" (book.book_id) } {
                    (book.title) " (" (book.book_id) ") "
                    button type="submit" { "Return" }
                }
            }
        },
    )
}

pub fn return_summary(summary: &ReturnSummary) -> Markup {
    layout(
        "Return summary",
        html! {
            dl {
                dt { "Book" } dd { (summary.book.title) }
                dt { "Member" } dd { (summary.member.name) }
                dt { "Days out" } dd { (summary.late_fee.days) }
                dt { "Late fee" } dd { (summary.late_fee.amount) }
                dt { "New balance" } dd { (summary.member.balance) }
                dt { "Fees paid" } dd { (summary.member.fees_paid) }
            }
            a href="/" { "Back to the catalog" }
        },
    )
}

pub fn error(status: StatusCode, message: &str) -> Markup {
    layout(
        status.canonical_reason().unwrap_or("Error"),
        html! {
            p.error { (message) }
            a href="/" { "Back to the catalog" }
        },
    )
}
