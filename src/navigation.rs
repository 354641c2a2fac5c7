//! This file defines the navigation bar and the user avatar shown in it.

use maud::{Markup, html};

use crate::{endpoints, models::User};

/// The id of the avatar element, which is filled in once the user has loaded.
pub const USER_AVATAR_ID: &str = "user-avatar";

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-4 rounded-full bg-gray-900 text-white
            dark:bg-white dark:text-gray-900"
        } else {
            "block py-2 px-4 rounded-full text-gray-500 hover:bg-gray-100
            hover:text-gray-900 dark:text-gray-400 dark:hover:bg-gray-700
            dark:hover:text-white"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::REVENUE_VIEW,
                title: "Revenue",
                is_current: active_endpoint == endpoints::REVENUE_VIEW,
            },
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="sticky top-0 z-40 bg-white dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex items-center justify-between mx-auto
                    m-4 px-6 py-3 rounded-full shadow-md dark:shadow-gray-800"
                {
                    a
                        href=(endpoints::ROOT)
                        class="text-xl font-bold text-gray-900 dark:text-white"
                    {
                        "Revenue"
                    }

                    ul class="flex gap-2 font-semibold"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }

                    (user_avatar(None))
                }
            }
        )
    }
}

const AVATAR_STYLE: &str = "flex items-center justify-center w-10 h-10 rounded-full \
    bg-gray-900 text-sm font-semibold text-white";

/// The circle with the user's initials, or an empty circle until the user has loaded.
pub fn user_avatar(user: Option<&User>) -> Markup {
    html!(
        div
            id=(USER_AVATAR_ID)
            class=(AVATAR_STYLE)
            title=[user.map(User::full_name)]
        {
            @if let Some(user) = user {
                (user.initials())
            }
        }
    )
}

/// An out-of-band swap that fills in the avatar in the navigation bar.
pub fn user_avatar_oob(user: &User) -> Markup {
    html!(
        div
            id=(USER_AVATAR_ID)
            hx-swap-oob="true"
            class=(AVATAR_STYLE)
            title=(user.full_name())
        {
            (user.initials())
        }
    )
}
