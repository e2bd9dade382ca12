use lumen_math::{Aabb, BoundingSphere, DMat3, DVec3};

use super::{BoundedArray, Combination, Element, Geometry};
use crate::material::MaterialId;

/// Double dispatch over element kinds, driven by [`Element::accept`].
pub trait ElementVisitor {
    type Output;

    fn visit_empty(&mut self, element: &Element) -> Self::Output;
    fn visit_geometry(
        &mut self,
        element: &Element,
        geometry: &Geometry,
        material: Option<MaterialId>,
    ) -> Self::Output;
    fn visit_tuple(&mut self, element: &Element, children: &[Element]) -> Self::Output;
    fn visit_array(&mut self, element: &Element, array: &BoundedArray) -> Self::Output;
    fn visit_union(&mut self, element: &Element, combination: &Combination) -> Self::Output;
    fn visit_intersection(&mut self, element: &Element, combination: &Combination)
        -> Self::Output;
    fn visit_subtraction(&mut self, element: &Element, combination: &Combination)
        -> Self::Output;
    fn visit_translate(
        &mut self,
        element: &Element,
        translation: DVec3,
        child: &Element,
    ) -> Self::Output;
    fn visit_scale(
        &mut self,
        element: &Element,
        factor: f64,
        center: DVec3,
        child: &Element,
    ) -> Self::Output;
    fn visit_rotate(
        &mut self,
        element: &Element,
        rotation: &DMat3,
        center: DVec3,
        child: &Element,
    ) -> Self::Output;
    fn visit_repeat_translate(
        &mut self,
        element: &Element,
        translation: DVec3,
        count: usize,
        child: &Element,
    ) -> Self::Output;
    fn visit_bounding_box(&mut self, element: &Element, bounds: &Aabb, child: &Element)
        -> Self::Output;
    fn visit_bounding_sphere(
        &mut self,
        element: &Element,
        sphere: &BoundingSphere,
        child: &Element,
    ) -> Self::Output;
}

/// Calls `f` on every element of the tree, parents before children, with
/// the depth of each element below `root`.
pub fn walk<'a>(root: &'a Element, f: &mut impl FnMut(&'a Element, usize)) {
    fn go<'a>(element: &'a Element, depth: usize, f: &mut impl FnMut(&'a Element, usize)) {
        f(element, depth);
        for child in element.children() {
            go(child, depth + 1, f);
        }
    }
    go(root, 0, f);
}

/// Short one-line label per element, for logs and debugging.
#[derive(Debug, Default)]
pub struct ElementLabeler;

fn fmt_vec(v: DVec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

impl ElementVisitor for ElementLabeler {
    type Output = String;

    fn visit_empty(&mut self, element: &Element) -> String {
        format!("#{} empty", element.id)
    }

    fn visit_geometry(
        &mut self,
        element: &Element,
        geometry: &Geometry,
        material: Option<MaterialId>,
    ) -> String {
        match material {
            Some(material) => format!("#{} {} material={}", element.id, geometry.name(), material),
            None => format!("#{} {}", element.id, geometry.name()),
        }
    }

    fn visit_tuple(&mut self, element: &Element, children: &[Element]) -> String {
        format!("#{} tuple of {}", element.id, children.len())
    }

    fn visit_array(&mut self, element: &Element, array: &BoundedArray) -> String {
        format!("#{} array of {}", element.id, array.elements.len())
    }

    fn visit_union(&mut self, element: &Element, _combination: &Combination) -> String {
        format!("#{} union", element.id)
    }

    fn visit_intersection(&mut self, element: &Element, _combination: &Combination) -> String {
        format!("#{} intersection", element.id)
    }

    fn visit_subtraction(&mut self, element: &Element, _combination: &Combination) -> String {
        format!("#{} subtraction", element.id)
    }

    fn visit_translate(&mut self, element: &Element, translation: DVec3, _child: &Element) -> String {
        format!("#{} translate {}", element.id, fmt_vec(translation))
    }

    fn visit_scale(
        &mut self,
        element: &Element,
        factor: f64,
        center: DVec3,
        _child: &Element,
    ) -> String {
        format!("#{} scale {} around {}", element.id, factor, fmt_vec(center))
    }

    fn visit_rotate(
        &mut self,
        element: &Element,
        _rotation: &DMat3,
        center: DVec3,
        _child: &Element,
    ) -> String {
        format!("#{} rotate around {}", element.id, fmt_vec(center))
    }

    fn visit_repeat_translate(
        &mut self,
        element: &Element,
        translation: DVec3,
        count: usize,
        _child: &Element,
    ) -> String {
        format!("#{} repeat {}x by {}", element.id, count, fmt_vec(translation))
    }

    fn visit_bounding_box(&mut self, element: &Element, bounds: &Aabb, _child: &Element) -> String {
        format!(
            "#{} bounding box {} to {}",
            element.id,
            fmt_vec(bounds.minimum()),
            fmt_vec(bounds.maximum())
        )
    }

    fn visit_bounding_sphere(
        &mut self,
        element: &Element,
        sphere: &BoundingSphere,
        _child: &Element,
    ) -> String {
        format!(
            "#{} bounding sphere r={} at {}",
            element.id,
            sphere.radius,
            fmt_vec(sphere.center)
        )
    }
}

/// Indented outline of the tree, one labeled element per line.
pub fn describe(root: &Element) -> String {
    let mut labeler = ElementLabeler;
    let mut out = String::new();
    walk(root, &mut |element, depth| {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&element.accept(&mut labeler));
        out.push('\n');
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementIdFactory;

    /// Counts leaves through the visitor rather than `children()`.
    struct LeafCounter;

    impl ElementVisitor for LeafCounter {
        type Output = usize;

        fn visit_empty(&mut self, _: &Element) -> usize {
            0
        }
        fn visit_geometry(&mut self, _: &Element, _: &Geometry, _: Option<MaterialId>) -> usize {
            1
        }
        fn visit_tuple(&mut self, _: &Element, children: &[Element]) -> usize {
            children.iter().map(|c| c.accept(self)).sum()
        }
        fn visit_array(&mut self, _: &Element, array: &BoundedArray) -> usize {
            array.elements.iter().map(|c| c.accept(self)).sum()
        }
        fn visit_union(&mut self, _: &Element, c: &Combination) -> usize {
            c.t0.accept(self) + c.t1.accept(self)
        }
        fn visit_intersection(&mut self, _: &Element, c: &Combination) -> usize {
            c.t0.accept(self) + c.t1.accept(self)
        }
        fn visit_subtraction(&mut self, _: &Element, c: &Combination) -> usize {
            c.t0.accept(self) + c.t1.accept(self)
        }
        fn visit_translate(&mut self, _: &Element, _: DVec3, child: &Element) -> usize {
            child.accept(self)
        }
        fn visit_scale(&mut self, _: &Element, _: f64, _: DVec3, child: &Element) -> usize {
            child.accept(self)
        }
        fn visit_rotate(&mut self, _: &Element, _: &DMat3, _: DVec3, child: &Element) -> usize {
            child.accept(self)
        }
        fn visit_repeat_translate(
            &mut self,
            _: &Element,
            _: DVec3,
            count: usize,
            child: &Element,
        ) -> usize {
            count * child.accept(self)
        }
        fn visit_bounding_box(&mut self, _: &Element, _: &Aabb, child: &Element) -> usize {
            child.accept(self)
        }
        fn visit_bounding_sphere(&mut self, _: &Element, _: &BoundingSphere, child: &Element) -> usize {
            child.accept(self)
        }
    }

    fn sample() -> Element {
        let mut root = Element::tuple(vec![
            Element::sphere(DVec3::ZERO, 1.0, Some(0))
                .subtraction(Element::cube(DVec3::ZERO, 1.0, None)),
            Element::cube(DVec3::ZERO, 1.0, None).repeated(DVec3::X * 2.0, 4),
            Element::empty(),
        ]);
        root.attribute_ids(&mut ElementIdFactory::new());
        root
    }

    #[test]
    fn test_walk_is_preorder() {
        let root = sample();
        let mut seen = Vec::new();
        walk(&root, &mut |element, depth| seen.push((element.id, depth)));

        assert_eq!(
            seen,
            vec![(0, 0), (1, 1), (2, 2), (3, 2), (4, 1), (5, 2), (6, 1)]
        );
    }

    #[test]
    fn test_visitor_dispatch() {
        assert_eq!(sample().accept(&mut LeafCounter), 6);
    }

    #[test]
    fn test_describe() {
        let text = describe(&sample());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "#0 tuple of 3");
        assert_eq!(lines[1], "  #1 subtraction");
        assert_eq!(lines[2], "    #2 sphere material=0");
        assert_eq!(lines[5], "    #5 cube");
        assert_eq!(lines[6], "  #6 empty");
    }
}
