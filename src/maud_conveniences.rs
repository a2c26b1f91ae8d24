use maud::{Markup, Render, html};

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn subtitle(s: impl Render) -> Markup {
    html! {
        h2 class="text-xl font-semibold mb-2" {(s)}
    }
}

pub fn section_heading(s: impl Render) -> Markup {
    html! {
        h3 class="text-lg font-semibold mt-4 mb-1 text-gray-300" {(s)}
    }
}

pub fn labelled(label: &str, value: impl Render) -> Markup {
    html! {
        p class="text-gray-200" {
            strong class="font-semibold" {(label) ":"}
            " "
            (value)
        }
    }
}

pub fn alert(heading: &str, desc: impl Render) -> Markup {
    html! {
        div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
            strong class="font-bold" {(heading)}
            " "
            span {(desc)}
        }
    }
}

pub fn notice(desc: impl Render) -> Markup {
    html! {
        div class="bg-yellow-100 border border-yellow-400 text-yellow-800 px-4 py-3 rounded relative mb-4" role="status" {
            span {(desc)}
        }
    }
}

pub fn action_button(hx_post: &str, label: impl Render) -> Markup {
    html! {
        button type="button" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" hx-post=(hx_post) hx-target="#directory" hx-swap="outerHTML" {
            (label)
        }
    }
}
