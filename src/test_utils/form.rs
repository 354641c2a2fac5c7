use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let hx_post = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        hx_post, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {hx_post:?}"
    );
}

/// The values of the checked checkboxes named `name`, in document order.
pub(crate) fn checked_values<'a>(form: &ElementRef<'a>, name: &str) -> Vec<&'a str> {
    let selector = Selector::parse(&format!("input[type=checkbox][name={name}][checked]")).unwrap();

    form.select(&selector)
        .filter_map(|input| input.value().attr("value"))
        .collect()
}
