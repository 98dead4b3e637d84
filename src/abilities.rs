use crate::error::UidlResult;
use crate::options::GeneratorOptions;
use crate::uidl::{AttributeValue, ComponentUidl, ElementNode, LinkAbility, Literal, UidlNode};
use crate::visitor::traverse_elements_mut;

/// Structural transform driven by the `abilities` markers of elements.
pub trait AbilityResolver: Send + Sync {
    fn resolve(&self, uidl: &mut ComponentUidl, options: &GeneratorOptions) -> UidlResult<()>;
}

/// Wraps elements that carry `abilities.link` in an abstract `link` or `navlink` element.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkAbilityResolver;

impl AbilityResolver for LinkAbilityResolver {
    fn resolve(&self, uidl: &mut ComponentUidl, options: &GeneratorOptions) -> UidlResult<()> {
        traverse_elements_mut(&mut uidl.node, |el| wrap_link(el, options));
        Ok(())
    }
}

fn static_str(value: String) -> AttributeValue {
    AttributeValue::Static(Literal::Str(value))
}

/// Turns a route name into the path a navlink points at. Unknown routes stay as they are.
fn navigation_target(route_name: String, options: &GeneratorOptions) -> String {
    let route = match options.routes().iter().find(|r| r.value == route_name) {
        Some(route) => route,
        None => return route_name,
    };
    let page = &route.page_options;
    let file_name = page.file_name.as_deref().filter(|_| options.use_file_name_for_navigation);
    match file_name.or(page.nav_link.as_deref()) {
        Some(path) => format!("/{}", path.trim_start_matches('/')),
        None => route_name,
    }
}

fn wrap_link(el: &mut ElementNode, options: &GeneratorOptions) {
    let link = match el.abilities.as_mut().and_then(|a| a.link.take()) {
        Some(link) => link,
        None => return,
    };
    if el.abilities.as_ref().is_some_and(|a| a.link.is_none()) {
        el.abilities = None;
    }

    let mut wrapper = ElementNode {
        key: format!("{}-link", el.key),
        name: Some(format!("{}-link", el.key)),
        ..Default::default()
    };

    match link {
        LinkAbility::Url { url, new_tab } => {
            wrapper.element_type = "link".to_string();
            wrapper.attrs.insert("url".to_string(), *url);
            if new_tab {
                wrapper
                    .attrs
                    .insert("target".to_string(), static_str("_blank".into()));
                wrapper
                    .attrs
                    .insert("rel".to_string(), static_str("noreferrer".into()));
            }
        }
        LinkAbility::Section { section } => {
            wrapper.element_type = "link".to_string();
            wrapper
                .attrs
                .insert("url".to_string(), static_str(format!("#{}", section)));
        }
        LinkAbility::Navlink { route_name } => {
            wrapper.element_type = "navlink".to_string();
            wrapper.attrs.insert(
                "transitionTo".to_string(),
                static_str(navigation_target(route_name, options)),
            );
        }
        LinkAbility::Mail {
            mail,
            subject,
            body,
        } => {
            let mut query = Vec::new();
            if let Some(subject) = subject {
                query.push(format!("subject={}", subject));
            }
            if let Some(body) = body {
                query.push(format!("body={}", body));
            }
            let href = if query.is_empty() {
                format!("mailto:{}", mail)
            } else {
                format!("mailto:{}?{}", mail, query.join("&"))
            };
            wrapper.element_type = "link".to_string();
            wrapper.attrs.insert("url".to_string(), static_str(href));
        }
        LinkAbility::Phone { phone } => {
            wrapper.element_type = "link".to_string();
            wrapper
                .attrs
                .insert("url".to_string(), static_str(format!("tel:{}", phone)));
        }
    }

    let inner = std::mem::take(el);
    wrapper.children = vec![UidlNode::Element(inner)];
    *el = wrapper;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{component_uidl, element};
    use crate::options::{PageOptions, RouteDefinitions, RouteValue};
    use crate::uidl::Abilities;

    fn navlink_page(route_name: &str) -> ComponentUidl {
        let mut anchor = element("text");
        anchor.abilities = Some(Abilities {
            link: Some(LinkAbility::Navlink {
                route_name: route_name.into(),
            }),
        });
        component_uidl("Menu", UidlNode::Element(anchor))
    }

    fn about_route(use_file_name_for_navigation: bool) -> GeneratorOptions {
        GeneratorOptions {
            project_route_definition: Some(RouteDefinitions {
                values: vec![RouteValue {
                    value: "about".into(),
                    page_options: PageOptions {
                        nav_link: Some("/about".into()),
                        file_name: Some("about-us".into()),
                        component_name: None,
                    },
                }],
            }),
            use_file_name_for_navigation,
            ..Default::default()
        }
    }

    fn transition_target(uidl: &ComponentUidl) -> AttributeValue {
        uidl.node.as_element().unwrap().attrs["transitionTo"].clone()
    }

    #[test]
    fn test_navlink_follows_route_table() {
        let mut uidl = navlink_page("about");
        LinkAbilityResolver.resolve(&mut uidl, &about_route(false)).unwrap();
        assert_eq!(transition_target(&uidl), static_str("/about".into()));

        let mut uidl = navlink_page("about");
        LinkAbilityResolver.resolve(&mut uidl, &about_route(true)).unwrap();
        assert_eq!(transition_target(&uidl), static_str("/about-us".into()));

        let mut uidl = navlink_page("contact");
        LinkAbilityResolver.resolve(&mut uidl, &about_route(false)).unwrap();
        assert_eq!(transition_target(&uidl), static_str("contact".into()));
    }

    #[test]
    fn test_mail_link_wraps_element() {
        let mut button = element("button");
        button.abilities = Some(Abilities {
            link: Some(LinkAbility::Mail {
                mail: "hi@example.com".into(),
                subject: Some("Hello".into()),
                body: None,
            }),
        });
        let mut uidl = component_uidl("Contact", UidlNode::Element(button));
        LinkAbilityResolver
            .resolve(&mut uidl, &GeneratorOptions::default())
            .unwrap();

        let link = uidl.node.as_element().unwrap();
        assert_eq!(link.element_type, "link");
        assert_eq!(
            link.attrs["url"],
            static_str("mailto:hi@example.com?subject=Hello".into())
        );
        let inner = link.children[0].as_element().unwrap();
        assert_eq!(inner.element_type, "button");
        assert!(inner.abilities.is_none());
    }
}
